// nfc-validator/src/ticketing/location.rs

/// Where the validator is, asked once per audit record.
pub trait LocationProvider {
    fn location(&self) -> String;
}

impl<T: LocationProvider + ?Sized> LocationProvider for Box<T> {
    fn location(&self) -> String {
        (**self).location()
    }
}

/// Location of a validator that never moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocation(String);

impl FixedLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}

impl LocationProvider for FixedLocation {
    fn location(&self) -> String {
        self.0.clone()
    }
}

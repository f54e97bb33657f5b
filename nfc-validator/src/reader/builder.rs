// nfc-validator/src/reader/builder.rs

use crate::constants::DEFAULT_RESPONSE_CAPACITY;
use crate::device::{ControllerModel, ReaderModel};
use crate::logging::{EventLog, LogFacade};
use crate::reader::Reader;
use crate::transport::Transport;
use crate::{Error, Result};

/// Helper to construct a Reader with optional configuration.
pub struct ReaderBuilder {
    transport: Option<Box<dyn Transport>>,
    model: ReaderModel,
    controller: ControllerModel,
    log: Option<Box<dyn EventLog>>,
    response_capacity: usize,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            model: ReaderModel::default(),
            controller: ControllerModel::default(),
            log: None,
            response_capacity: DEFAULT_RESPONSE_CAPACITY,
        }
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_reader_model(mut self, model: ReaderModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_controller(mut self, controller: ControllerModel) -> Self {
        self.controller = controller;
        self
    }

    /// Event log; defaults to [`LogFacade`].
    pub fn with_log(mut self, log: Box<dyn EventLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Receive buffer size handed to the transport on every transmit.
    pub fn with_response_capacity(mut self, capacity: usize) -> Self {
        self.response_capacity = capacity;
        self
    }

    /// Consume the builder. A transport is required.
    pub fn build(self) -> Result<Reader> {
        let transport = self
            .transport
            .ok_or_else(|| Error::Configuration("no transport provided".into()))?;
        if self.response_capacity == 0 {
            return Err(Error::Configuration(
                "response capacity must not be zero".into(),
            ));
        }
        Ok(Reader::from_parts(
            transport,
            self.model,
            self.controller,
            self.log.unwrap_or_else(|| Box::new(LogFacade)),
            self.response_capacity,
        ))
    }
}

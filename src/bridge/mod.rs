//! Attribute bridge
//!
//! Entry point for the attribute dispatcher of the BLE stack. Every
//! characteristic access arrives here with the handle assigned at
//! registration; the bridge decodes the fixed-width payload and forwards it
//! to the control state.

mod attribute;
mod error;

use heapless::{LinearMap, Vec};
use log::{debug, error, warn};

pub use attribute::{
    AttributeId, CHANNEL_WIDTH, CharacteristicDef, ControlAttribute, DELAY_WIDTH, DescriptorDef,
    LED_SERVICE, LED_SERVICE_UUID, ServiceDef, USER_DESCRIPTION_UUID, Uuid,
};
pub use error::{
    ATT_ERR_INVALID_ATTR_VALUE_LEN, ATT_ERR_UNLIKELY, ATT_ERR_WRITE_NOT_PERMITTED, AttributeError,
};

use crate::state::ControlState;

/// Largest value returned by a read, fits the default ATT MTU
pub const MAX_PAYLOAD_LEN: usize = 20;

/// Encoded attribute value
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

// Every label is served whole
const _: () = {
    let mut i = 0;
    while i < ControlAttribute::ALL.len() {
        assert!(ControlAttribute::ALL[i].label().len() <= MAX_PAYLOAD_LEN);
        i += 1;
    }
};

/// Attribute registered by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Service {
        uuid: Uuid,
        handle: u16,
    },
    Characteristic {
        uuid: Uuid,
        value_handle: u16,
    },
    Descriptor {
        characteristic: Uuid,
        uuid: Uuid,
        handle: u16,
    },
}

/// Bridge between remote attribute access and the control state.
///
/// Handles are resolved to attributes once, during registration. Reads and
/// writes take `&self` and may run concurrently with each other and with
/// the animation engine.
///
/// The dispatcher may report the whole attribute table, including services
/// the bridge does not serve (GAP, GATT). Those services and everything
/// registered under them are skipped.
pub struct ControlBridge<'a> {
    state: &'a ControlState,
    handles: LinearMap<u16, AttributeId, { AttributeId::COUNT }>,
    foreign_service: bool,
}

impl<'a> ControlBridge<'a> {
    pub const fn new(state: &'a ControlState) -> Self {
        Self {
            state,
            handles: LinearMap::new(),
            foreign_service: false,
        }
    }

    /// Record a handle reported by the dispatcher's registration callback
    ///
    /// Returns the attribute bound to the handle, `None` for a service and for
    /// anything registered under a foreign service. Inside the LED service an
    /// unknown characteristic or descriptor is an error.
    pub fn register(
        &mut self,
        registration: Registration,
    ) -> Result<Option<AttributeId>, AttributeError> {
        let (id, handle) = match registration {
            Registration::Service { uuid, handle } => {
                self.foreign_service = uuid != LED_SERVICE_UUID;
                if self.foreign_service {
                    debug!("bridge: skipping foreign service {} at handle {}", uuid, handle);
                } else {
                    debug!("bridge: registered service {} with handle={}", uuid, handle);
                }
                return Ok(None);
            }
            Registration::Characteristic { value_handle, .. } if self.foreign_service => {
                debug!("bridge: skipping foreign characteristic at handle {}", value_handle);
                return Ok(None);
            }
            Registration::Descriptor { handle, .. } if self.foreign_service => {
                debug!("bridge: skipping foreign descriptor at handle {}", handle);
                return Ok(None);
            }
            Registration::Characteristic { uuid, value_handle } => {
                (AttributeId::resolve(uuid, None), value_handle)
            }
            Registration::Descriptor {
                characteristic,
                uuid,
                handle,
            } => (AttributeId::resolve(characteristic, Some(uuid)), handle),
        };

        match id {
            Ok(id) => {
                debug!("bridge: registered {:?} with handle={}", id, handle);
                self.bind(handle, id);
                Ok(Some(id))
            }
            Err(uuid) => {
                let err = AttributeError::UnknownUuid(uuid);
                error!("bridge: cannot register handle {}: {}", handle, err);
                Err(err)
            }
        }
    }

    /// Bind a handle to an attribute, replacing any previous binding of either
    pub fn bind(&mut self, handle: u16, id: AttributeId) {
        if let Some(previous) = self.handle(id) {
            self.handles.remove(&previous);
        }
        // One handle per attribute, the map never holds more than COUNT entries
        if let Err((handle, id)) = self.handles.insert(handle, id) {
            error!("bridge: handle table full, dropped {:?} at handle {}", id, handle);
        }
    }

    /// Attribute bound to a handle
    pub fn attribute(&self, handle: u16) -> Option<AttributeId> {
        self.handles.get(&handle).copied()
    }

    /// Handle bound to an attribute
    pub fn handle(&self, id: AttributeId) -> Option<u16> {
        self.handles
            .iter()
            .find(|(_, bound)| **bound == id)
            .map(|(handle, _)| *handle)
    }

    /// Serve a read request
    pub fn read_attribute(&self, handle: u16) -> Result<Payload, AttributeError> {
        let id = self.resolve(handle)?;
        debug!("bridge: read {:?}", id);
        Ok(self.read(id))
    }

    /// Serve a write request
    ///
    /// The control state is left untouched unless the whole payload is valid.
    pub fn write_attribute(&self, handle: u16, value: &[u8]) -> Result<(), AttributeError> {
        let id = self.resolve(handle)?;
        if !id.is_writable() {
            warn!("bridge: write to read-only {:?}", id);
            return Err(AttributeError::ReadOnly(handle));
        }
        let (AttributeId::Value(attribute) | AttributeId::Description(attribute)) = id;

        let result = self.write(attribute, value);
        match &result {
            Ok(()) => debug!("bridge: wrote {:?}", attribute),
            Err(err) => warn!("bridge: rejected write to {:?}: {}", attribute, err),
        }
        result
    }

    /// Encode the current value of an attribute
    pub fn read(&self, id: AttributeId) -> Payload {
        match id {
            AttributeId::Value(ControlAttribute::Channel(channel)) => {
                payload(&[self.state.channel(channel)])
            }
            AttributeId::Value(ControlAttribute::Delay) => {
                payload(&self.state.delay_ms().to_le_bytes())
            }
            AttributeId::Description(attribute) => payload(attribute.label().as_bytes()),
        }
    }

    /// Decode and store a value
    pub fn write(&self, attribute: ControlAttribute, value: &[u8]) -> Result<(), AttributeError> {
        match attribute {
            ControlAttribute::Channel(channel) => {
                let [level] = fixed::<CHANNEL_WIDTH>(value)?;
                self.state.set_channel(channel, level);
            }
            ControlAttribute::Delay => {
                let bytes = fixed::<DELAY_WIDTH>(value)?;
                self.state.set_delay_ms(u32::from_le_bytes(bytes));
            }
        }
        Ok(())
    }

    fn resolve(&self, handle: u16) -> Result<AttributeId, AttributeError> {
        self.attribute(handle).ok_or_else(|| {
            // The dispatcher routed a handle we never registered
            error!("bridge: access to unknown attribute handle {}", handle);
            AttributeError::UnknownAttribute(handle)
        })
    }
}

fn fixed<const N: usize>(value: &[u8]) -> Result<[u8; N], AttributeError> {
    value.try_into().map_err(|_| AttributeError::Length {
        expected: N,
        actual: value.len(),
    })
}

fn payload(bytes: &[u8]) -> Payload {
    debug_assert!(bytes.len() <= MAX_PAYLOAD_LEN, "attribute value exceeds payload");
    let mut payload = Payload::new();
    let len = bytes.len().min(MAX_PAYLOAD_LEN);
    let _ = payload.extend_from_slice(&bytes[..len]);
    payload
}

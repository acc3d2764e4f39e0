//! LED service attribute table
//!
//! Static description of every attribute the bridge serves, keyed by the
//! UUIDs the remote peer sees.

use core::fmt;

use crate::color::ColorChannel;

/// Attribute type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uuid {
    /// Bluetooth SIG assigned 16-bit UUID
    Short(u16),
    /// Vendor specific 128-bit UUID
    Long(u128),
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Short(uuid) => write!(f, "0x{:04x}", uuid),
            Self::Long(uuid) => write!(
                f,
                "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
                uuid >> 96,
                (uuid >> 80) & 0xffff,
                (uuid >> 64) & 0xffff,
                (uuid >> 48) & 0xffff,
                uuid & 0xffff_ffff_ffff
            ),
        }
    }
}

/// Characteristic User Description descriptor
pub const USER_DESCRIPTION_UUID: Uuid = Uuid::Short(0x2901);

pub const LED_SERVICE_UUID: Uuid = Uuid::Long(0x41c6b692_0ba0_4b73_b586_35a268a320ef);

const RED_UUID: Uuid = Uuid::Long(0xd7419b26_1437_4f29_a6c8_259cf01bc815);
const GREEN_UUID: Uuid = Uuid::Long(0x3fa4eea9_5368_4f1b_9687_10574f0adcae);
const BLUE_UUID: Uuid = Uuid::Long(0x8f61467a_c4ff_4ebb_943d_49596f9fd4e7);
const DELAY_UUID: Uuid = Uuid::Long(0xdfae6ade_d0fe_453e_ba47_07b8a3c6bbb5);

const RED_LABEL: &str = "RedLedBrightness";
const GREEN_LABEL: &str = "GreenLedBrightness";
const BLUE_LABEL: &str = "BlueLedBrightness";
const DELAY_LABEL: &str = "LedDelayBrightness";

/// Width of a color channel value on the wire
pub const CHANNEL_WIDTH: usize = 1;

/// Width of the delay value on the wire, little endian
pub const DELAY_WIDTH: usize = 4;

/// Readable and writable characteristic of the LED service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAttribute {
    Channel(ColorChannel),
    Delay,
}

impl ControlAttribute {
    pub const ALL: [Self; 4] = [
        Self::Channel(ColorChannel::Red),
        Self::Channel(ColorChannel::Green),
        Self::Channel(ColorChannel::Blue),
        Self::Delay,
    ];

    pub const fn uuid(self) -> Uuid {
        match self {
            Self::Channel(ColorChannel::Red) => RED_UUID,
            Self::Channel(ColorChannel::Green) => GREEN_UUID,
            Self::Channel(ColorChannel::Blue) => BLUE_UUID,
            Self::Delay => DELAY_UUID,
        }
    }

    /// Human readable name exposed through the user description
    pub const fn label(self) -> &'static str {
        match self {
            Self::Channel(ColorChannel::Red) => RED_LABEL,
            Self::Channel(ColorChannel::Green) => GREEN_LABEL,
            Self::Channel(ColorChannel::Blue) => BLUE_LABEL,
            Self::Delay => DELAY_LABEL,
        }
    }

    /// Exact payload length accepted on write
    pub const fn width(self) -> usize {
        match self {
            Self::Channel(_) => CHANNEL_WIDTH,
            Self::Delay => DELAY_WIDTH,
        }
    }

    pub fn from_uuid(uuid: Uuid) -> Option<Self> {
        Self::ALL.into_iter().find(|attribute| attribute.uuid() == uuid)
    }
}

/// Any attribute served by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeId {
    /// Value of a characteristic, backed by the control state
    Value(ControlAttribute),
    /// Constant user description of a characteristic
    Description(ControlAttribute),
}

impl AttributeId {
    pub const COUNT: usize = 2 * ControlAttribute::ALL.len();

    /// Resolve a registered characteristic value (`descriptor == None`) or one
    /// of its descriptors
    ///
    /// On failure returns the UUID that is not part of the LED service: the
    /// characteristic if it is foreign, otherwise the descriptor.
    pub fn resolve(characteristic: Uuid, descriptor: Option<Uuid>) -> Result<Self, Uuid> {
        let attribute = ControlAttribute::from_uuid(characteristic).ok_or(characteristic)?;
        match descriptor {
            None => Ok(Self::Value(attribute)),
            Some(USER_DESCRIPTION_UUID) => Ok(Self::Description(attribute)),
            Some(uuid) => Err(uuid),
        }
    }

    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Descriptor entry of the service table
#[derive(Debug, Clone, Copy)]
pub struct DescriptorDef {
    pub uuid: Uuid,
    pub label: &'static str,
}

/// Characteristic entry of the service table
#[derive(Debug, Clone, Copy)]
pub struct CharacteristicDef {
    pub attribute: ControlAttribute,
    pub uuid: Uuid,
    pub description: DescriptorDef,
}

impl CharacteristicDef {
    const fn new(attribute: ControlAttribute) -> Self {
        Self {
            attribute,
            uuid: attribute.uuid(),
            description: DescriptorDef {
                uuid: USER_DESCRIPTION_UUID,
                label: attribute.label(),
            },
        }
    }
}

/// Primary service definition handed to the attribute dispatcher
#[derive(Debug, Clone, Copy)]
pub struct ServiceDef {
    pub uuid: Uuid,
    pub characteristics: &'static [CharacteristicDef],
}

pub const LED_SERVICE: ServiceDef = ServiceDef {
    uuid: LED_SERVICE_UUID,
    characteristics: &[
        CharacteristicDef::new(ControlAttribute::Channel(ColorChannel::Red)),
        CharacteristicDef::new(ControlAttribute::Channel(ColorChannel::Green)),
        CharacteristicDef::new(ControlAttribute::Channel(ColorChannel::Blue)),
        CharacteristicDef::new(ControlAttribute::Delay),
    ],
};

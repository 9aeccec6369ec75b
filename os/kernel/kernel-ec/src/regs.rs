//! EC register map.

use bitfield_struct::bitfield;
use kernel_ports::SubAddress;

/// Address in the EC's 16-bit register space.
///
/// The I2EC window latches it one byte at a time, low byte first.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct EcAddress {
    /// Bits 0–7, latched through `I2EC_ADDR_L`.
    pub low: u8,

    /// Bits 8–15, latched through `I2EC_ADDR_H`.
    pub high: u8,
}

impl SubAddress<2> for EcAddress {
    #[inline]
    fn to_le_bytes(self) -> [u8; 2] {
        [self.low(), self.high()]
    }
}

/// Where the EC firmware keeps the fan and temperature registers.
///
/// Only one firmware layout is known; [`EcRegisterOffsets::V0`] is used
/// unconditionally.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EcRegisterOffsets {
    pub fan1_rpm_lsb: EcAddress,
    pub fan1_rpm_msb: EcAddress,
    pub fan2_rpm_lsb: EcAddress,
    pub fan2_rpm_msb: EcAddress,

    /// Nonzero while the external fan target registers are in effect.
    pub ext_fan_ctrl_en: EcAddress,
    pub ext_fan1_target_rpm: EcAddress,
    pub ext_fan2_target_rpm: EcAddress,
    pub ext_cpu_temp: EcAddress,
    pub ext_env_temp: EcAddress,
}

impl EcRegisterOffsets {
    pub const V0: Self = Self {
        fan1_rpm_lsb: EcAddress::from_bits(0x181e),
        fan1_rpm_msb: EcAddress::from_bits(0x181f),
        fan2_rpm_lsb: EcAddress::from_bits(0x1820),
        fan2_rpm_msb: EcAddress::from_bits(0x1821),

        ext_fan_ctrl_en: EcAddress::from_bits(0xd130),
        ext_fan1_target_rpm: EcAddress::from_bits(0xd16f),
        ext_fan2_target_rpm: EcAddress::from_bits(0xd133),
        ext_cpu_temp: EcAddress::from_bits(0xd118),
        ext_env_temp: EcAddress::from_bits(0xd115),
    };
}

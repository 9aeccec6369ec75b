//! A software model of the Wujie SuperIO/I2EC chain.
//!
//! `FakeBoard` is a cloneable handle; every clone shares the same state so a
//! test can keep one clone for inspection while the controller owns another.

#![allow(dead_code)]

use kernel_ec::bridge::{
    I2EC_ADDR_H, I2EC_ADDR_L, I2EC_DATA, PNP_ADDR, PNP_DATA, SUPERIO_ADDR, SUPERIO_DATA,
};
use kernel_ports::PortIo;
use std::sync::{Arc, Mutex};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PortOp {
    Out(u16, u8),
    In(u16, u8),
}

struct State {
    pnp_index: u8,
    superio_index: u8,
    i2ec_addr: u16,
    ec: Vec<u8>,
    ops: Vec<PortOp>,
}

#[derive(Clone)]
pub struct FakeBoard {
    state: Arc<Mutex<State>>,
}

impl Default for FakeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBoard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                pnp_index: 0,
                superio_index: 0,
                i2ec_addr: 0,
                ec: vec![0; 0x1_0000],
                ops: Vec::new(),
            })),
        }
    }

    pub fn set_ec(&self, addr: u16, value: u8) {
        self.state.lock().unwrap().ec[usize::from(addr)] = value;
    }

    pub fn ec(&self, addr: u16) -> u8 {
        self.state.lock().unwrap().ec[usize::from(addr)]
    }

    pub fn set_tach(&self, lsb_addr: u16, count: u16) {
        let [lsb, msb] = count.to_le_bytes();
        self.set_ec(lsb_addr, lsb);
        self.set_ec(lsb_addr + 1, msb);
    }

    pub fn ops(&self) -> Vec<PortOp> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.lock().unwrap().ops.clear();
    }

    /// Number of live clones of this board, including `self`.
    pub fn handles(&self) -> usize {
        Arc::strong_count(&self.state)
    }
}

impl State {
    fn superio_write(&mut self, index: u8, value: u8) {
        match index {
            I2EC_ADDR_L => self.i2ec_addr = (self.i2ec_addr & 0xff00) | u16::from(value),
            I2EC_ADDR_H => self.i2ec_addr = (self.i2ec_addr & 0x00ff) | (u16::from(value) << 8),
            I2EC_DATA => self.ec[usize::from(self.i2ec_addr)] = value,
            _ => {}
        }
    }

    fn superio_read(&self, index: u8) -> u8 {
        match index {
            I2EC_ADDR_L => self.i2ec_addr.to_le_bytes()[0],
            I2EC_ADDR_H => self.i2ec_addr.to_le_bytes()[1],
            I2EC_DATA => self.ec[usize::from(self.i2ec_addr)],
            _ => 0xff,
        }
    }
}

impl PortIo for FakeBoard {
    fn outb(&mut self, port: u16, value: u8) {
        let mut s = self.state.lock().unwrap();
        s.ops.push(PortOp::Out(port, value));
        match port {
            PNP_ADDR => s.pnp_index = value,
            PNP_DATA => match s.pnp_index {
                SUPERIO_ADDR => s.superio_index = value,
                SUPERIO_DATA => {
                    let index = s.superio_index;
                    s.superio_write(index, value);
                }
                _ => {}
            },
            _ => panic!("write to unexpected port {port:#06x}"),
        }
    }

    fn inb(&mut self, port: u16) -> u8 {
        let mut s = self.state.lock().unwrap();
        let value = match port {
            PNP_ADDR => s.pnp_index,
            PNP_DATA => match s.pnp_index {
                SUPERIO_ADDR => s.superio_index,
                SUPERIO_DATA => s.superio_read(s.superio_index),
                _ => 0xff,
            },
            _ => panic!("read from unexpected port {port:#06x}"),
        };
        s.ops.push(PortOp::In(port, value));
        value
    }
}

/// Port operations of one EC register access to `addr`, up to but not
/// including the final data operation.
pub fn latch_prefix(addr: u16) -> [PortOp; 11] {
    let [lo, hi] = addr.to_le_bytes();
    [
        PortOp::Out(PNP_ADDR, SUPERIO_ADDR),
        PortOp::Out(PNP_DATA, I2EC_ADDR_L),
        PortOp::Out(PNP_ADDR, SUPERIO_DATA),
        PortOp::Out(PNP_DATA, lo),
        PortOp::Out(PNP_ADDR, SUPERIO_ADDR),
        PortOp::Out(PNP_DATA, I2EC_ADDR_H),
        PortOp::Out(PNP_ADDR, SUPERIO_DATA),
        PortOp::Out(PNP_DATA, hi),
        PortOp::Out(PNP_ADDR, SUPERIO_ADDR),
        PortOp::Out(PNP_DATA, I2EC_DATA),
        PortOp::Out(PNP_ADDR, SUPERIO_DATA),
    ]
}

/// Full port sequence of an EC register write.
pub fn ec_write_ops(addr: u16, value: u8) -> Vec<PortOp> {
    let mut ops = latch_prefix(addr).to_vec();
    ops.push(PortOp::Out(PNP_DATA, value));
    ops
}

/// Full port sequence of an EC register read returning `value`.
pub fn ec_read_ops(addr: u16, value: u8) -> Vec<PortOp> {
    let mut ops = latch_prefix(addr).to_vec();
    ops.push(PortOp::In(PNP_DATA, value));
    ops
}

/// Number of port operations in one EC register access.
pub const OPS_PER_ACCESS: usize = 12;

/// Decodes one EC access from exactly [`OPS_PER_ACCESS`] port operations.
///
/// Returns `(addr, data_op)` if the slice is one uninterrupted access.
pub fn decode_access(ops: &[PortOp]) -> Option<(u16, PortOp)> {
    if ops.len() != OPS_PER_ACCESS {
        return None;
    }
    let lo = match ops[3] {
        PortOp::Out(PNP_DATA, v) => v,
        _ => return None,
    };
    let hi = match ops[7] {
        PortOp::Out(PNP_DATA, v) => v,
        _ => return None,
    };
    let addr = u16::from_le_bytes([lo, hi]);
    let data = ops[11];
    if !matches!(data, PortOp::Out(PNP_DATA, _) | PortOp::In(PNP_DATA, _)) {
        return None;
    }
    (ops[..11] == latch_prefix(addr)).then_some((addr, data))
}

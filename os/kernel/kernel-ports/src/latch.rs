use core::marker::PhantomData;

/// A byte-wide register file.
pub trait RegisterBus {
    type Addr: Copy;

    fn write(&mut self, addr: Self::Addr, value: u8);
    fn read(&mut self, addr: Self::Addr) -> u8;
}

/// An address that is latched as `N` bytes, least significant first.
pub trait SubAddress<const N: usize>: Copy {
    fn to_le_bytes(self) -> [u8; N];
}

impl SubAddress<1> for u8 {
    #[inline]
    fn to_le_bytes(self) -> [u8; 1] {
        [self]
    }
}

impl SubAddress<2> for u16 {
    #[inline]
    fn to_le_bytes(self) -> [u8; 2] {
        Self::to_le_bytes(self)
    }
}

/// Index/data register pair on top of another bus.
///
/// An access first writes every byte of the address into its index register
/// (`index[0]` gets the low byte) and then writes or reads the `data`
/// register. The pattern repeats at every level of a SuperIO style chain:
///
/// ```text
/// Latch<PortBus<P>, u8, 1>      index port 0x4e, data port 0x4f
/// Latch<_, u8, 1>               index 0x2e,      data 0x2f   (through the above)
/// Latch<_, u16, 2>              index 0x10/0x11, data 0x12   (through the above)
/// ```
///
/// The address latch is shared device state. Two interleaved accesses read or
/// write each other's register; keep the latch behind a lock.
#[derive(Debug)]
pub struct Latch<B: RegisterBus, A, const N: usize> {
    bus: B,
    index: [B::Addr; N],
    data: B::Addr,
    _addr: PhantomData<fn(A)>,
}

impl<B: RegisterBus, A, const N: usize> Latch<B, A, N> {
    #[must_use]
    pub const fn new(bus: B, index: [B::Addr; N], data: B::Addr) -> Self {
        Self {
            bus,
            index,
            data,
            _addr: PhantomData,
        }
    }

    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    #[must_use]
    pub fn into_inner(self) -> B {
        self.bus
    }
}

impl<B, A, const N: usize> Latch<B, A, N>
where
    B: RegisterBus,
    A: SubAddress<N>,
{
    #[inline]
    fn select(&mut self, addr: A) {
        for (reg, byte) in self.index.into_iter().zip(addr.to_le_bytes()) {
            self.bus.write(reg, byte);
        }
    }
}

impl<B, A, const N: usize> RegisterBus for Latch<B, A, N>
where
    B: RegisterBus,
    A: SubAddress<N>,
{
    type Addr = A;

    #[inline]
    fn write(&mut self, addr: A, value: u8) {
        self.select(addr);
        self.bus.write(self.data, value);
    }

    #[inline]
    fn read(&mut self, addr: A) -> u8 {
        self.select(addr);
        self.bus.read(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Op {
        W(u8, u8),
        R(u8),
    }

    #[derive(Default)]
    struct Log {
        ops: Vec<Op>,
    }

    impl RegisterBus for Log {
        type Addr = u8;

        fn write(&mut self, addr: u8, value: u8) {
            self.ops.push(Op::W(addr, value));
        }

        fn read(&mut self, addr: u8) -> u8 {
            self.ops.push(Op::R(addr));
            0x5a
        }
    }

    #[test]
    fn single_byte_latch_writes_index_then_data() {
        let mut l: Latch<Log, u8, 1> = Latch::new(Log::default(), [0x2e], 0x2f);
        l.write(0x07, 0x11);
        assert_eq!(l.read(0x20), 0x5a);
        assert_eq!(
            l.bus().ops,
            [Op::W(0x2e, 0x07), Op::W(0x2f, 0x11), Op::W(0x2e, 0x20), Op::R(0x2f)]
        );
    }

    #[test]
    fn wide_latch_sends_low_byte_first() {
        let mut l: Latch<Log, u16, 2> = Latch::new(Log::default(), [0x10, 0x11], 0x12);
        l.write(0xd1_30, 1);
        assert_eq!(
            l.into_inner().ops,
            [Op::W(0x10, 0x30), Op::W(0x11, 0xd1), Op::W(0x12, 1)]
        );
    }

    #[test]
    fn latches_stack() {
        let inner: Latch<Log, u8, 1> = Latch::new(Log::default(), [0x2e], 0x2f);
        let mut outer: Latch<_, u8, 1> = Latch::new(inner, [0x10], 0x12);
        outer.write(0x44, 0x99);
        assert_eq!(
            outer.into_inner().into_inner().ops,
            [
                Op::W(0x2e, 0x10),
                Op::W(0x2f, 0x44),
                Op::W(0x2e, 0x12),
                Op::W(0x2f, 0x99)
            ]
        );
    }
}

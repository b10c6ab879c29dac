//! Flat 1 MiB physical memory.
//!
//! No segmentation, paging or protection. Every access is bounds-checked and
//! an offset past the end raises `Fault::AddressOutOfRange`.

use std::ops::Range;

use crate::Fault;

/// Size of the physical address space (20 address lines).
pub const MEMORY_SIZE: usize = 1024 * 1024;

/// Start of the firmware region. Also the reset entry point.
pub const FIRMWARE_BASE: u32 = 0xF_E000;

/// Size of the firmware region (top 8 KiB of the address space).
pub const FIRMWARE_SIZE: usize = 0x2000;

/// Physical address of `segment:offset` in real mode.
///
/// Wraps at 1 MiB like an 8086 without an A20 line. No decoded instruction
/// uses this: all addressing in the core is flat.
#[must_use]
pub const fn linear_address(segment: u16, offset: u16) -> u32 {
    (((segment as u32) << 4) + offset as u32) & (MEMORY_SIZE as u32 - 1)
}

/// Physical memory owned by a single CPU.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl Memory {
    /// Zero-filled 1 MiB memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Memory with `image` copied into the firmware region.
    pub fn with_firmware(image: &[u8]) -> Result<Self, Fault> {
        let mut memory = Self::new();
        memory.load_firmware(image)?;
        Ok(memory)
    }

    fn index(address: u32) -> Result<usize, Fault> {
        let index = address as usize;
        if index < MEMORY_SIZE {
            Ok(index)
        } else {
            Err(Fault::AddressOutOfRange(address))
        }
    }

    /// Read a byte.
    pub fn read(&self, address: u32) -> Result<u8, Fault> {
        Ok(self.bytes[Self::index(address)?])
    }

    /// Read a little-endian word. Both bytes must be in range.
    pub fn read_u16(&self, address: u32) -> Result<u16, Fault> {
        let lo = self.read(address)?;
        let hi = self.read(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a byte.
    pub fn write(&mut self, address: u32, value: u8) -> Result<(), Fault> {
        let index = Self::index(address)?;
        self.bytes[index] = value;
        Ok(())
    }

    /// Copy `data` into memory starting at `address`.
    ///
    /// Fails without writing anything if the block does not fit.
    pub fn load(&mut self, address: u32, data: &[u8]) -> Result<(), Fault> {
        let start = Self::index(address)?;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= MEMORY_SIZE)
            .ok_or(Fault::AddressOutOfRange(
                address.saturating_add(data.len() as u32),
            ))?;
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Copy a firmware image to `FIRMWARE_BASE`.
    pub fn load_firmware(&mut self, image: &[u8]) -> Result<(), Fault> {
        if image.len() > FIRMWARE_SIZE {
            return Err(Fault::AddressOutOfRange(
                FIRMWARE_BASE.saturating_add(image.len() as u32),
            ));
        }
        self.load(FIRMWARE_BASE, image)
    }

    /// Read-only view of a physical range.
    pub fn slice(&self, range: Range<u32>) -> Result<&[u8], Fault> {
        let start = Self::index(range.start)?;
        if range.end as usize > MEMORY_SIZE {
            return Err(Fault::AddressOutOfRange(range.end));
        }
        Ok(self.bytes.get(start..range.end as usize).unwrap_or_default())
    }

    /// The whole address space.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// The firmware region.
    #[must_use]
    pub fn firmware(&self) -> &[u8] {
        &self.bytes[FIRMWARE_BASE as usize..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firmware_region_is_top_8k() {
        assert_eq!(FIRMWARE_BASE as usize + FIRMWARE_SIZE, MEMORY_SIZE);
        assert_eq!(Memory::new().firmware().len(), FIRMWARE_SIZE);
    }

    #[test]
    fn read_write_within_range() {
        let mut mem = Memory::new();
        mem.write(0, 0x12).expect("in range");
        mem.write(0xF_FFFF, 0x34).expect("in range");
        assert_eq!(mem.read(0), Ok(0x12));
        assert_eq!(mem.read(0xF_FFFF), Ok(0x34));
    }

    #[test]
    fn out_of_range_is_a_fault() {
        let mut mem = Memory::new();
        assert_eq!(mem.read(0x10_0000), Err(Fault::AddressOutOfRange(0x10_0000)));
        assert_eq!(
            mem.write(u32::MAX, 0),
            Err(Fault::AddressOutOfRange(u32::MAX))
        );
        // A word straddling the top of memory is rejected as a whole.
        assert_eq!(
            mem.read_u16(0xF_FFFF),
            Err(Fault::AddressOutOfRange(0x10_0000))
        );
    }

    #[test]
    fn words_are_little_endian() {
        let mut mem = Memory::new();
        mem.load(0x100, &[0x34, 0x12]).expect("fits");
        assert_eq!(mem.read_u16(0x100), Ok(0x1234));
    }

    #[test]
    fn firmware_lands_at_base() {
        let mem = Memory::with_firmware(&[0xB8, 0x34, 0x12, 0xF4]).expect("fits");
        assert_eq!(mem.read(FIRMWARE_BASE), Ok(0xB8));
        assert_eq!(mem.read(FIRMWARE_BASE + 3), Ok(0xF4));
        assert_eq!(&mem.firmware()[..4], &[0xB8, 0x34, 0x12, 0xF4]);
    }

    #[test]
    fn full_size_firmware_fits_but_larger_does_not() {
        assert!(Memory::with_firmware(&[0x90; FIRMWARE_SIZE]).is_ok());
        assert!(Memory::with_firmware(&[0x90; FIRMWARE_SIZE + 1]).is_err());
    }

    #[test]
    fn load_past_end_writes_nothing() {
        let mut mem = Memory::new();
        assert!(mem.load(0xF_FFFE, &[1, 2, 3]).is_err());
        assert_eq!(mem.read(0xF_FFFE), Ok(0));
        assert_eq!(mem.read(0xF_FFFF), Ok(0));
    }

    #[test]
    fn slice_is_bounds_checked() {
        let mut mem = Memory::new();
        mem.load(0x10, &[1, 2, 3]).expect("fits");
        assert_eq!(mem.slice(0x10..0x13), Ok(&[1u8, 2, 3][..]));
        assert!(mem.slice(0xF_FFF0..0x10_0001).is_err());
    }

    #[test]
    fn linear_address_shifts_segment() {
        assert_eq!(linear_address(0xF000, 0xE000), 0xF_E000);
        assert_eq!(linear_address(0x1234, 0x0010), 0x1_2350);
        // FFFF:0010 wraps to 0 without A20.
        assert_eq!(linear_address(0xFFFF, 0x0010), 0);
    }
}

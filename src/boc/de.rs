use smallvec::SmallVec;

use super::BocTag;
use crate::cell::{Cell, CellDescriptor, MAX_REF_COUNT};
use crate::util::{read_be_u32, read_be_u64, unlikely};

/// Parsed BOC header.
pub struct BocHeader<'a> {
    ref_size: usize,
    cells: SmallVec<[&'a [u8]; CELLS_ON_STACK]>,
    root: u32,
}

impl<'a> BocHeader<'a> {
    /// Decodes boc info from the specified bytes.
    pub fn decode(data: &'a [u8]) -> Result<Self, Error> {
        let mut reader = BocReader::new(data);

        // 4 bytes - tag
        // 1 byte - flags
        // 1 byte - offset size
        let Some(header) = reader.read_bytes(6) else {
            return Err(Error::UnexpectedEof);
        };
        let flags = header[4];
        let offset_size = header[5] as usize;

        let has_index;
        let has_crc;
        let has_cache_bits;
        let ref_size;
        let supports_multiple_roots;

        match BocTag::from_bytes([header[0], header[1], header[2], header[3]]) {
            Some(BocTag::Indexed) => {
                has_index = true;
                has_crc = false;
                has_cache_bits = false;
                ref_size = flags as usize;
                supports_multiple_roots = false;
            }
            Some(BocTag::IndexedCrc32) => {
                has_index = true;
                has_crc = true;
                has_cache_bits = false;
                ref_size = flags as usize;
                supports_multiple_roots = false;
            }
            Some(BocTag::Generic) => {
                has_index = flags & 0b1000_0000 != 0;
                has_crc = flags & 0b0100_0000 != 0;
                has_cache_bits = flags & 0b0010_0000 != 0;
                ref_size = (flags & 0b0000_0111) as usize;
                supports_multiple_roots = true;
            }
            None => return Err(Error::UnknownBocTag),
        }

        if unlikely(has_cache_bits && !has_index) {
            return Err(Error::InvalidHeader);
        }
        if unlikely(ref_size == 0 || ref_size > std::mem::size_of::<u32>()) {
            return Err(Error::InvalidRefSize);
        }
        if unlikely(offset_size == 0 || offset_size > std::mem::size_of::<u64>()) {
            return Err(Error::InvalidOffsetSize);
        }

        // {ref_size} bytes - cell count
        // {ref_size} bytes - root count
        // {ref_size} bytes - absent cell count
        // {offset_size} bytes - total cells size
        let (Some(cell_count), Some(root_count), Some(absent_count), Some(total_cells_size)) = (
            reader.read_be_uint(ref_size),
            reader.read_be_uint(ref_size),
            reader.read_be_uint(ref_size),
            reader.read_be_uint_full(offset_size),
        ) else {
            return Err(Error::InvalidHeader);
        };

        if unlikely(root_count == 0) {
            return Err(Error::RootCellNotFound);
        }
        if unlikely(root_count > 1) {
            return Err(Error::UnexpectedMultipleRoots);
        }
        if unlikely(root_count.saturating_add(absent_count) > cell_count) {
            return Err(Error::TooManyRootCells);
        }
        if unlikely(absent_count > 0) {
            return Err(Error::AbsentCellsNotSupported);
        }

        const MIN_CELL_SIZE: u64 = 2; // [d1, d2]

        let min_total_cell_size = (cell_count as u64) * (MIN_CELL_SIZE + ref_size as u64)
            - (root_count * ref_size) as u64;
        if unlikely(total_cells_size < min_total_cell_size) {
            return Err(Error::InvalidTotalSize);
        }

        // 2 bytes - descriptor
        // 4 * (2 + 32) - inline hashes and depths if presented
        // 128 - max data length
        // 4*{ref_size} - max references
        let max_cell_size = 2 + 4 * (2 + 32) + 128 + (MAX_REF_COUNT as u64) * ref_size as u64;
        if unlikely(total_cells_size > (cell_count as u64) * max_cell_size) {
            return Err(Error::InvalidTotalSize);
        }

        let root = if supports_multiple_roots {
            let Some(root_index) = reader.read_be_uint(ref_size) else {
                return Err(Error::UnexpectedEof);
            };
            if unlikely(root_index >= cell_count) {
                return Err(Error::RootOutOfBounds);
            }
            root_index as u32
        } else {
            0
        };

        if has_index && reader.read_bytes(cell_count * offset_size).is_none() {
            return Err(Error::UnexpectedEof);
        }

        let cells_start_offset = reader.offset;

        let mut cells = SmallVec::with_capacity(std::cmp::min(cell_count, CELLS_ON_STACK * 64));
        for _ in 0..cell_count {
            let Some(&[d1, d2]) = reader.peek_bytes(2) else {
                return Err(Error::UnexpectedEof);
            };
            let descriptor = CellDescriptor { d1, d2 };

            // 0b11111111 -> 0b01111111 + 1 = 0b10000000 = byte len 128, max bit len = 1023
            // 0b11111110 -> 0b01111111 = byte len 127, bit len = 1016
            let data_len = descriptor.byte_len() as usize;
            let ref_count = descriptor.reference_count() as usize;
            if unlikely(ref_count > MAX_REF_COUNT) {
                return Err(Error::InvalidRef);
            }
            if unlikely(descriptor.is_exotic() || descriptor.level_mask() != 0) {
                return Err(Error::InvalidCell);
            }

            let data_offset = if d1 & STORE_HASHES_MASK != 0 {
                32 + 2
            } else {
                0
            };

            let total_len = 2 + data_offset + data_len + ref_count * ref_size;
            let Some(cell) = reader.read_bytes(total_len) else {
                return Err(Error::UnexpectedEof);
            };

            if data_len > 0 && !descriptor.is_aligned() {
                let byte_with_tag = cell[2 + data_offset + data_len - 1];
                if unlikely(byte_with_tag & 0x7f == 0) {
                    return Err(Error::UnnormalizedCell);
                }
            }

            cells.push(cell);
        }

        // Check that `total_cells_size` is correct
        if (cells_start_offset as u64).saturating_add(total_cells_size) != reader.offset as u64 {
            return Err(Error::InvalidTotalSize);
        }

        // Verify checksum if specified
        if has_crc {
            let crc_offset = reader.offset;
            let Some(crc) = reader.read_bytes(4) else {
                return Err(Error::UnexpectedEof);
            };

            let parsed_crc = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
            let real_crc = crc32c::crc32c(&data[..crc_offset]);
            if parsed_crc != real_crc {
                return Err(Error::InvalidChecksum);
            }
        }

        Ok(Self {
            ref_size,
            cells,
            root,
        })
    }

    /// Assembles the cell tree and returns its root.
    pub fn finalize(&self) -> Result<Cell, Error> {
        let ref_size = self.ref_size;
        let cell_count = self.cells.len() as u32;

        // Cells are stored in reverse order, so children are always processed first
        let mut res = Vec::<Cell>::new();
        if res.try_reserve_exact(cell_count as usize).is_err() {
            return Err(Error::InvalidTotalSize);
        }

        for (index, cell) in self.cells.iter().enumerate().rev() {
            let descriptor = CellDescriptor {
                d1: cell[0],
                d2: cell[1],
            };
            let byte_len = descriptor.byte_len() as usize;

            let mut offset = 2;
            if cell[0] & STORE_HASHES_MASK != 0 {
                offset += 32 + 2;
            }

            let data = &cell[offset..offset + byte_len];
            offset += byte_len;

            let bit_len = if descriptor.is_aligned() {
                (byte_len * 8) as u16
            } else if let Some(data) = data.last() {
                byte_len as u16 * 8 - data.trailing_zeros() as u16 - 1
            } else {
                0
            };

            let mut references = SmallVec::<[Cell; MAX_REF_COUNT]>::new();
            for _ in 0..descriptor.reference_count() {
                let child_index = read_be_u32(&cell[offset..], ref_size);
                if child_index >= cell_count {
                    return Err(Error::InvalidRef);
                }
                if child_index as usize <= index {
                    return Err(Error::InvalidRefOrder);
                }

                match res.get((cell_count - child_index - 1) as usize) {
                    Some(child) => references.push(child.clone()),
                    None => return Err(Error::InvalidRefOrder),
                }

                offset += ref_size;
            }

            match Cell::from_parts(bit_len, data, references) {
                Ok(cell) => res.push(cell),
                Err(_) => return Err(Error::InvalidCell),
            }
        }

        match res.get((cell_count - self.root - 1) as usize) {
            Some(root) => Ok(root.clone()),
            None => Err(Error::RootOutOfBounds),
        }
    }

    /// Cell index size in bytes. Guaranteed to be 4 at max.
    pub fn ref_size(&self) -> usize {
        self.ref_size
    }

    /// Slices of the unique cells.
    pub fn cells(&self) -> &[&'a [u8]] {
        &self.cells
    }
}

/// Bounds-checked cursor over the BOC bytes.
struct BocReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BocReader<'a> {
    #[inline]
    const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    fn peek_bytes(&self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        self.data.get(self.offset..end)
    }

    #[inline]
    fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let bytes = self.peek_bytes(len)?;
        self.offset += len;
        Some(bytes)
    }

    /// `size` must be in range `1..=4`.
    #[inline]
    fn read_be_uint(&mut self, size: usize) -> Option<usize> {
        let bytes = self.read_bytes(size)?;
        Some(read_be_u32(bytes, size) as usize)
    }

    /// `size` must be in range `1..=8`.
    #[inline]
    fn read_be_uint_full(&mut self, size: usize) -> Option<u64> {
        let bytes = self.read_bytes(size)?;
        Some(read_be_u64(bytes, size))
    }
}

const STORE_HASHES_MASK: u8 = 0b0001_0000;

const CELLS_ON_STACK: usize = 16;

/// Error type for BOC decoding related errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// EOF encountered during another operation.
    #[error("unexpected EOF")]
    UnexpectedEof,
    /// Invalid magic bytes.
    #[error("unknown BOC tag")]
    UnknownBocTag,
    /// Invalid BOC header.
    #[error("invalid header")]
    InvalidHeader,
    /// References size is greater than 4.
    #[error("ref index does not fit in `u32` type")]
    InvalidRefSize,
    /// Offset size is greater than 8.
    #[error("cell offset does not fit in `u64` type")]
    InvalidOffsetSize,
    /// Root cell not found.
    #[error("root cell not found")]
    RootCellNotFound,
    /// Only single-root BOCs are supported.
    #[error("unexpected multiple roots")]
    UnexpectedMultipleRoots,
    /// The number of roots in BOC is greater than the number of cells.
    #[error("too many root cells")]
    TooManyRootCells,
    /// Absent cells are legacy therefore not supported.
    #[error("absent cells are not supported")]
    AbsentCellsNotSupported,
    /// Total cells size mismatch.
    #[error("invalid total cells size")]
    InvalidTotalSize,
    /// Invalid root cell index.
    #[error("root index out of bounds")]
    RootOutOfBounds,
    /// Invalid child reference.
    #[error("cell ref count not in range 0..=4")]
    InvalidRef,
    /// Suboptimal cells are treated as error.
    #[error("unnormalized cell")]
    UnnormalizedCell,
    /// Possible graph loop detected.
    #[error("invalid children order")]
    InvalidRefOrder,
    /// Failed to parse cell.
    #[error("invalid cell")]
    InvalidCell,
    /// Crc mismatch.
    #[error("invalid checksum")]
    InvalidChecksum,
}

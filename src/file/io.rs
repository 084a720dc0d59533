//! Low-level little-endian reads over byte slices.
//!
//! Every metadata structure in a .NET image is stored little-endian. These helpers read a
//! primitive at an offset with bounds checking and advance the offset, which is the access
//! pattern used by all table row readers.

use crate::{Error::OutOfBounds, Result};

/// Trait implemented by the primitive integer types that can be read out of metadata.
pub trait CilIO: Sized {
    /// Fixed-size byte array backing this type
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode a value from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Read a `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a `T` at `offset` and advance `offset` by its size.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(T::from_le_bytes(read))
}

/// Read a heap or table index that is either 2 or 4 bytes wide.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would exceed `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

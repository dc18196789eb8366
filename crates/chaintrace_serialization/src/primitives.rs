use crate::{NumBytes, Read, ReadError, VarUint32, Write, WriteError};

macro_rules! impl_num {
    ($($t:ty),*) => {$(
        impl NumBytes for $t {
            #[inline(always)]
            fn num_bytes(&self) -> usize {
                core::mem::size_of::<$t>()
            }
        }

        impl Read for $t {
            #[inline(always)]
            fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
                let size = core::mem::size_of::<$t>();
                if *pos + size > bytes.len() {
                    return Err(ReadError::NotEnoughBytes);
                }
                let mut buf = [0u8; core::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[*pos..*pos + size]);
                *pos += size;
                Ok(<$t>::from_le_bytes(buf))
            }
        }

        impl Write for $t {
            #[inline(always)]
            fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
                let size = core::mem::size_of::<$t>();
                if *pos + size > bytes.len() {
                    return Err(WriteError::NotEnoughSpace);
                }
                bytes[*pos..*pos + size].copy_from_slice(&self.to_le_bytes());
                *pos += size;
                Ok(())
            }
        }
    )*};
}

impl_num!(u8, i8, u16, i16, u32, i32, u64, i64);

impl NumBytes for bool {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        1
    }
}

impl Read for bool {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        Ok(u8::read(bytes, pos)? != 0)
    }
}

impl Write for bool {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        (*self as u8).write(bytes, pos)
    }
}

impl NumBytes for usize {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        VarUint32::from(*self).num_bytes()
    }
}

impl NumBytes for String {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.len().num_bytes() + self.len()
    }
}

impl Read for String {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let len = VarUint32::read(bytes, pos)?.0 as usize;
        if *pos + len > bytes.len() {
            return Err(ReadError::NotEnoughBytes);
        }
        let value = core::str::from_utf8(&bytes[*pos..*pos + len])
            .map_err(|_| ReadError::ParseError)?
            .to_string();
        *pos += len;
        Ok(value)
    }
}

impl Write for String {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        VarUint32::from(self.len()).write(bytes, pos)?;
        if *pos + self.len() > bytes.len() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + self.len()].copy_from_slice(self.as_bytes());
        *pos += self.len();
        Ok(())
    }
}

impl<T: NumBytes> NumBytes for Vec<T> {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        let mut count = self.len().num_bytes();
        for item in self {
            count += item.num_bytes();
        }
        count
    }
}

impl<T: Read> Read for Vec<T> {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let len = VarUint32::read(bytes, pos)?.0 as usize;
        let mut items = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            items.push(T::read(bytes, pos)?);
        }
        Ok(items)
    }
}

impl<T: Write> Write for Vec<T> {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        VarUint32::from(self.len()).write(bytes, pos)?;
        for item in self {
            item.write(bytes, pos)?;
        }
        Ok(())
    }
}

impl<T: NumBytes> NumBytes for Option<T> {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        match self {
            Some(value) => 1 + value.num_bytes(),
            None => 1,
        }
    }
}

impl<T: Read> Read for Option<T> {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        match u8::read(bytes, pos)? {
            0 => Ok(None),
            1 => Ok(Some(T::read(bytes, pos)?)),
            _ => Err(ReadError::ParseError),
        }
    }
}

impl<T: Write> Write for Option<T> {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        match self {
            Some(value) => {
                1u8.write(bytes, pos)?;
                value.write(bytes, pos)
            }
            None => 0u8.write(bytes, pos),
        }
    }
}

impl<A: NumBytes, B: NumBytes> NumBytes for (A, B) {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.0.num_bytes() + self.1.num_bytes()
    }
}

impl<A: Read, B: Read> Read for (A, B) {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        Ok((A::read(bytes, pos)?, B::read(bytes, pos)?))
    }
}

impl<A: Write, B: Write> Write for (A, B) {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.0.write(bytes, pos)?;
        self.1.write(bytes, pos)
    }
}

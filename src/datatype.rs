//! Datatype identifiers and the descriptor table behind them.
//!
//! tessera defines its own type enum so it remains a standalone library
//! usable by any Rust project. Element sizes and display names live in a
//! [`DatatypeRegistry`], an explicitly constructed, immutable lookup table
//! shared by reference through each communicator rather than held as
//! ambient global state.

/// Data types supported by tessera for collective operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    F32 = 0,
    F64 = 1,
    F16 = 2,
    BF16 = 3,
    I8 = 4,
    I32 = 5,
    I64 = 6,
    U8 = 7,
    U32 = 8,
    U64 = 9,
}

impl DataType {
    /// Every registered datatype, in identifier order.
    pub const ALL: [DataType; 10] = [
        DataType::F32,
        DataType::F64,
        DataType::F16,
        DataType::BF16,
        DataType::I8,
        DataType::I32,
        DataType::I64,
        DataType::U8,
        DataType::U32,
        DataType::U64,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// One registry row: fixed element byte size plus a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatatypeDescriptor {
    size_in_bytes: usize,
    name: &'static str,
}

impl DatatypeDescriptor {
    /// Size of one element in bytes. Always greater than zero.
    pub const fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

const fn descriptor(size_in_bytes: usize, name: &'static str) -> DatatypeDescriptor {
    DatatypeDescriptor {
        size_in_bytes,
        name,
    }
}

/// Immutable table mapping a [`DataType`] identifier to its descriptor.
///
/// Lookups are pure functions of the identifier. The identifier enum is
/// closed, so every lookup resolves.
#[derive(Debug, Clone)]
pub struct DatatypeRegistry {
    table: [DatatypeDescriptor; 10],
}

impl DatatypeRegistry {
    /// Build the registry of built-in datatypes.
    pub const fn builtin() -> Self {
        Self {
            table: [
                descriptor(4, "f32"),
                descriptor(8, "f64"),
                descriptor(2, "f16"),
                descriptor(2, "bf16"),
                descriptor(1, "i8"),
                descriptor(4, "i32"),
                descriptor(8, "i64"),
                descriptor(1, "u8"),
                descriptor(4, "u32"),
                descriptor(8, "u64"),
            ],
        }
    }

    /// Element size of `dtype` in bytes.
    pub const fn size_of(&self, dtype: DataType) -> usize {
        self.table[dtype.index()].size_in_bytes
    }

    /// Display name of `dtype`.
    pub const fn name_of(&self, dtype: DataType) -> &'static str {
        self.table[dtype.index()].name
    }

    /// Full descriptor of `dtype`.
    pub const fn descriptor_of(&self, dtype: DataType) -> &DatatypeDescriptor {
        &self.table[dtype.index()]
    }
}

impl Default for DatatypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

//! Account addresses and asset identifiers.
//!
//! ## Address
//!
//! Addresses are fixed-width 32-byte identifiers. They are displayed and
//! parsed as `0x`-prefixed lowercase hex.
//!
//! ## Asset Identifier
//!
//! An [`AssetId`] is either the native asset or the address of an external
//! token contract. The native asset uses the reserved all-zero identifier,
//! which no token contract can occupy.
//!
//! ```
//! use dark_exchange::types::{Address, AssetId};
//!
//! let token: Address = "0x0101010101010101010101010101010101010101010101010101010101010101"
//!     .parse()
//!     .unwrap();
//!
//! assert!(AssetId::NATIVE.is_native());
//! assert_eq!(AssetId::token(token).token_address(), Some(token));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 32;

/// Error returned when parsing an address from hex
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAddressError {
    /// The string is not valid hex
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded value is not 32 bytes
    #[error("expected {ADDRESS_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

// ============================================================================
// Address
// ============================================================================

/// A 32-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address ("no address")
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Wrap raw bytes
    #[inline]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// An address with every byte set to `byte`
    ///
    /// Handy for fixtures: `Address::repeat_byte(0xA1)`.
    #[inline]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    /// Raw bytes
    #[inline]
    pub const fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// Borrow the raw bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the all-zero address
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shortened form keeps test failures and log lines readable
        let encoded = hex::encode(self.0);
        write!(f, "Address(0x{}..{})", &encoded[..8], &encoded[encoded.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| ParseAddressError::InvalidHex(e.to_string()))?;
        let bytes: [u8; ADDRESS_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// AssetId
// ============================================================================

/// Identifier of a tradable asset.
///
/// Treated as an opaque, equality-comparable key by the ledger. Use
/// [`AssetId::kind`] when the distinction between native and token matters
/// (deposit and withdraw).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssetId(Address);

/// Decoded form of an [`AssetId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// The chain's intrinsic currency
    Native,
    /// An external fungible-token contract
    Token(Address),
}

impl AssetId {
    /// The native asset (reserved all-zero identifier)
    pub const NATIVE: AssetId = AssetId(Address::ZERO);

    /// Asset backed by the token contract at `contract`
    ///
    /// Passing the zero address yields [`AssetId::NATIVE`].
    #[inline]
    pub const fn token(contract: Address) -> Self {
        Self(contract)
    }

    /// Whether this is the native asset
    #[inline]
    pub fn is_native(&self) -> bool {
        self.0.is_zero()
    }

    /// The token contract address, or `None` for the native asset
    #[inline]
    pub fn token_address(&self) -> Option<Address> {
        if self.is_native() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Native or token
    #[inline]
    pub fn kind(&self) -> AssetKind {
        match self.token_address() {
            Some(contract) => AssetKind::Token(contract),
            None => AssetKind::Native,
        }
    }

    /// Raw identifier bytes (all zero for native)
    #[inline]
    pub const fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0.to_bytes()
    }
}

impl From<[u8; ADDRESS_LEN]> for AssetId {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(Address::from_bytes(bytes))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            AssetKind::Native => f.write_str("native"),
            AssetKind::Token(contract) => write!(f, "{}", contract),
        }
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            AssetKind::Native => f.write_str("AssetId::Native"),
            AssetKind::Token(contract) => write!(f, "AssetId::Token({:?})", contract),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

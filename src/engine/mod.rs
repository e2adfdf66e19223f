//! Matching engine for the Dark Exchange.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Determinism**: Same transitions always produce the same state root
//! 2. **Integer Math**: Amounts in smallest units, products in u128, no floats
//! 3. **Atomicity**: Each transition applies completely or not at all
//! 4. **Maker-addressed takes**: A taker names the exact order it consumes
//!
//! ## Matching Rules
//!
//! - An order fixes `sell_amount : buy_amount` for its whole life
//! - Takes may be **partial**; the taker chooses how much buy asset to pay
//! - Paying the full remaining capacity **sweeps** the unfilled remainder
//! - **Expired** orders cannot be taken but stay locked until cancelled
//!
//! ## Example
//!
//! ```
//! use dark_exchange::engine::fill;
//! use dark_exchange::types::{Address, AssetId, Order, OrderHash, PlaceOrder};
//!
//! let order = Order::new(Address::repeat_byte(1), &PlaceOrder {
//!     sell_amount: 10_000,
//!     buy_amount: 20_000,
//!     expiration: 100,
//!     sell_token: AssetId::NATIVE,
//!     buy_token: AssetId::token(Address::repeat_byte(0x70)),
//!     hash: OrderHash::from_bytes([1u8; 32]),
//! });
//!
//! assert_eq!(fill::capacity(&order), 20_000);
//! assert_eq!(fill::quote(&order, 10_000), Ok(5_000));
//! ```

pub mod exchange;
pub mod fill;
pub mod gateway;

pub use exchange::Exchange;
pub use fill::Fill;
pub use gateway::{AssetGateway, GatewayError, InMemoryGateway, TransferIn, TransferOut, TransferReceipt};

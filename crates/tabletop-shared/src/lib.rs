//! # tabletop-shared
//!
//! Domain primitives shared by the store and the server: the die table and
//! dice resolution, access tokens, password hashing, and small value types.
//! Nothing in here touches the database or the network.

pub mod constants;
pub mod dice;
pub mod error;
pub mod password;
pub mod token;
pub mod types;

pub mod filter;
pub mod streampot;

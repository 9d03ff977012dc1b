pub mod alias;

pub use alias::TeamAliases;

// handlers/mod.rs - Handler tiers
//
// Public (no token) → Protected (tenant-scoped, authenticated and authorized)
// → Elevated (global routes above tenant scope, same middleware chain)
//
// Most protected groups are thin `crud::Resource` impls; the generic
// handlers in `crud` do the work.

pub mod crud;
pub mod elevated;
pub mod protected;
pub mod public;

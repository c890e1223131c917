/// Shape canonicalization into bit-encoded orientations
pub mod canonical;
/// Query driver and per-puzzle aggregation
pub mod executor;
/// Remaining-area and connectivity pruning
pub mod feasibility;
/// Item construction and search ordering
pub mod ordering;
/// Backtracking placement search
pub mod packer;

pub mod broad_phase;
pub mod contact;
pub mod narrow_phase;
pub mod solver;

pub use self::broad_phase::candidate_pairs;
pub use self::contact::ContactManifold;
pub use self::narrow_phase::generate_manifolds;
pub use self::solver::ImpulseSolver;

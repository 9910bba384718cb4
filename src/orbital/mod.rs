pub mod elements;
pub mod kepler;
pub mod maneuvers;

pub use elements::{elements_to_state, state_to_elements, OrbitalElements};
pub use kepler::{solve_kepler, solve_kepler_detailed, wrap_angle, KeplerSolution};
pub use maneuvers::{circular_state, circular_velocity, tangential_burn};

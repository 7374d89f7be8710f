pub mod acceleration;
pub mod aerodynamics;
pub mod curve;
pub mod top_speed;

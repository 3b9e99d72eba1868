pub mod biomechanics;
pub mod drills;

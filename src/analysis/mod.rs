pub mod attention;
pub mod drowsiness;
pub mod emotion;
pub mod fusion;

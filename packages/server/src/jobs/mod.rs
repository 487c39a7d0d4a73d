pub mod monthly;

pub mod console;
pub mod input;
pub mod input_loop;

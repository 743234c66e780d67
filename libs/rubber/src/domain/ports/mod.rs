pub mod secondary;

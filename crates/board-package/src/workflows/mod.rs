pub mod board_package;

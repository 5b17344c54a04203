mod details;
mod grid;

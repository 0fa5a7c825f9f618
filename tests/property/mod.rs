mod geometry;
mod resolution;

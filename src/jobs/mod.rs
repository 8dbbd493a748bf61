pub mod lifecycle_sweep;

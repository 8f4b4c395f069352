pub mod processo;

mod predict_price;

pub use predict_price::*;

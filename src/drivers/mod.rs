//! Output drivers, the display bus and hardware initialisation.

pub mod hw_init;
pub mod indicator;
pub mod relay;
pub mod tm1637;

//! Screen implementations. Each screen is a top-level Component.

pub mod addresses;
pub mod map;

use ftthmap_config::MapDefaults;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens(map: MapDefaults) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Map, Box::new(map::MapScreen::new(map))),
        (
            ScreenId::Addresses,
            Box::new(addresses::AddressesScreen::new()),
        ),
    ]
}

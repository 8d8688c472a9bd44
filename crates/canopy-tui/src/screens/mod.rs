//! Screen implementations. Each screen is a top-level Component.

pub mod dashboard;
pub mod entity;
pub mod login;

use std::sync::Arc;

use canopy_core::{
    Animal, ApiClient, ForestOfficer, HttpGateway, Plant, Resource, Session, Tree, Visitor,
};

use crate::component::Component;
use crate::screen::ScreenId;

use self::dashboard::DashboardScreen;
use self::entity::EntityScreen;

/// Build the signed-in screen set: the dashboard plus one management
/// screen per record type, all sharing one HTTP client.
pub fn create_screens(
    client: &Arc<ApiClient>,
    session: &Session,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    let gateway = || HttpGateway::new(Arc::clone(client));
    vec![
        (ScreenId::Dashboard, Box::new(DashboardScreen::new(session))),
        (ScreenId::Animals, Box::new(EntityScreen::<Animal>::new(gateway()))),
        (ScreenId::Trees, Box::new(EntityScreen::<Tree>::new(gateway()))),
        (ScreenId::Plants, Box::new(EntityScreen::<Plant>::new(gateway()))),
        (ScreenId::Officers, Box::new(EntityScreen::<ForestOfficer>::new(gateway()))),
        (ScreenId::Visitors, Box::new(EntityScreen::<Visitor>::new(gateway()))),
        (ScreenId::Resources, Box::new(EntityScreen::<Resource>::new(gateway()))),
    ]
}

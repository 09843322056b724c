pub(crate) mod guarded_route;
pub(crate) mod layout;
pub(crate) mod loading;
pub(crate) mod preferences_menu;

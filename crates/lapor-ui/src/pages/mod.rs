pub(crate) mod add;
pub(crate) mod edit;
pub(crate) mod home;
pub(crate) mod login;
pub(crate) mod not_found;
pub(crate) mod register;
pub(crate) mod reports;

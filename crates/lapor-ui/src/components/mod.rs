pub(crate) mod fields;
pub(crate) mod modal;
pub(crate) mod navbar;
pub(crate) mod pager;
pub(crate) mod protected_image;
pub(crate) mod report_form;
pub(crate) mod toast;

//! Shared client components handed to pages through context.

use std::rc::Rc;

use lapor_client::{
    AuthService, AuthenticatedFetch, ClientConfig, HttpTransport, ImageHandleFactory,
    ProtectedImageLoader, ReportRepository, SessionProvider,
};

use crate::services::images::ObjectUrlFactory;
use crate::services::session::LocalStorageSession;
use crate::services::transport::GlooTransport;

#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) session: Rc<dyn SessionProvider>,
    pub(crate) auth: Rc<AuthService>,
    pub(crate) repository: Rc<ReportRepository>,
    pub(crate) images: Rc<ProtectedImageLoader>,
    pub(crate) image_factory: Rc<dyn ImageHandleFactory>,
}

impl Services {
    pub(crate) fn new(api_base_url: &str) -> Self {
        let config = ClientConfig::from_api_base(api_base_url);
        let transport: Rc<dyn HttpTransport> = Rc::new(GlooTransport);
        let session: Rc<dyn SessionProvider> = Rc::new(LocalStorageSession);
        let image_factory: Rc<dyn ImageHandleFactory> = Rc::new(ObjectUrlFactory);
        let fetch = Rc::new(AuthenticatedFetch::new(
            Rc::clone(&transport),
            Rc::clone(&session),
            config.clone(),
        ));
        let images = Rc::new(ProtectedImageLoader::new(
            transport,
            Rc::clone(&session),
            Rc::clone(&image_factory),
            config,
        ));
        Self {
            session,
            auth: Rc::new(AuthService::new(Rc::clone(&fetch))),
            repository: Rc::new(ReportRepository::new(fetch)),
            images,
            image_factory,
        }
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.repository, &other.repository)
    }
}

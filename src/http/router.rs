//! Route table composition.
//!
//! # Responsibilities
//! - Group endpoints of each service family under its configured prefix
//! - Attach the family's authorization gate (every family but callbacks)
//! - Register handler functions per method + path
//! - Wrap the table with request-id and tracing layers
//!
//! # Design Decisions
//! - `build_router` holds no state between calls; every call yields an
//!   independent table
//! - Gates are `layer`s on the group router, so they run for every request
//!   under the group's prefix before any handler

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ConfigProvider, ServicePrefixes};
use crate::context::{SelfContextProvider, ServiceName};
use crate::http::middleware::authorization_middleware;
use crate::processor::{
    handle_create_ee_subscription, handle_delete_ee_subscription, handle_not_implemented,
    handle_update_ee_subscription, Processor,
};
use crate::security::RouterAuthorizationCheck;

type ProcessorState = Arc<Processor>;

/// One (method, path suffix, handler) entry of a route group.
pub struct Route {
    pub name: &'static str,
    pub method: MethodFilter,
    pub pattern: &'static str,
    handler: MethodRouter<ProcessorState>,
}

impl Route {
    pub fn new<H, T>(name: &'static str, method: MethodFilter, pattern: &'static str, handler: H) -> Self
    where
        H: Handler<T, ProcessorState>,
        T: 'static,
    {
        Self {
            name,
            method,
            pattern,
            handler: on(method, handler),
        }
    }
}

/// Endpoints sharing a URI prefix and an optional authorization gate.
pub struct RouteGroup {
    pub prefix: String,
    pub service: Option<ServiceName>,
    pub routes: Vec<Route>,
}

impl RouteGroup {
    fn into_router(self, context: &Arc<dyn SelfContextProvider>) -> Router<ProcessorState> {
        let mut by_path: BTreeMap<&'static str, MethodRouter<ProcessorState>> = BTreeMap::new();
        for route in self.routes {
            tracing::debug!(
                name = route.name,
                method = ?route.method,
                path = %format!("{}{}", self.prefix, route.pattern),
                "Registering route"
            );
            let handler = match by_path.remove(route.pattern) {
                Some(existing) => existing.merge(route.handler),
                None => route.handler,
            };
            by_path.insert(route.pattern, handler);
        }

        let mut router = Router::new();
        for (pattern, handler) in by_path {
            router = router.route(pattern, handler);
        }

        match self.service {
            Some(service) => {
                let gate = Arc::new(RouterAuthorizationCheck::new(service, Arc::clone(context)));
                router.layer(middleware::from_fn_with_state(gate, authorization_middleware))
            }
            None => router,
        }
    }
}

/// Build the complete SBI route table.
pub fn build_router(
    processor: Arc<Processor>,
    context: Arc<dyn SelfContextProvider>,
    config: &dyn ConfigProvider,
) -> Router {
    let mut app = Router::new();
    for group in route_groups(config.service_prefixes()) {
        let prefix = group.prefix.clone();
        let router = group.into_router(&context);
        app = if prefix.is_empty() {
            app.merge(router)
        } else {
            app.nest(&prefix, router)
        };
    }

    app.with_state(processor).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

/// Every service family of the UDM with its routes.
pub fn route_groups(prefixes: &ServicePrefixes) -> Vec<RouteGroup> {
    vec![
        RouteGroup {
            prefix: prefixes.event_exposure.clone(),
            service: Some(ServiceName::NudmEe),
            routes: event_exposure_routes(),
        },
        RouteGroup {
            prefix: prefixes.callback.clone(),
            service: None,
            routes: callback_routes(),
        },
        RouteGroup {
            prefix: prefixes.ue_authentication.clone(),
            service: Some(ServiceName::NudmUeau),
            routes: ue_authentication_routes(),
        },
        RouteGroup {
            prefix: prefixes.ue_context_management.clone(),
            service: Some(ServiceName::NudmUecm),
            routes: ue_context_management_routes(),
        },
        RouteGroup {
            prefix: prefixes.subscriber_data_management.clone(),
            service: Some(ServiceName::NudmSdm),
            routes: subscriber_data_management_routes(),
        },
        RouteGroup {
            prefix: prefixes.parameter_provision.clone(),
            service: Some(ServiceName::NudmPp),
            routes: parameter_provision_routes(),
        },
    ]
}

fn event_exposure_routes() -> Vec<Route> {
    vec![
        Route::new(
            "CreateEeSubscription",
            MethodFilter::POST,
            "/{ue_identity}/ee-subscriptions",
            handle_create_ee_subscription,
        ),
        Route::new(
            "DeleteEeSubscription",
            MethodFilter::DELETE,
            "/{ue_identity}/ee-subscriptions/{subscription_id}",
            handle_delete_ee_subscription,
        ),
        Route::new(
            "UpdateEeSubscription",
            MethodFilter::PATCH,
            "/{ue_identity}/ee-subscriptions/{subscription_id}",
            handle_update_ee_subscription,
        ),
    ]
}

fn callback_routes() -> Vec<Route> {
    vec![Route::new(
        "DataChangeNotificationToNF",
        MethodFilter::POST,
        "/sdm-subscriptions",
        handle_not_implemented,
    )]
}

fn ue_authentication_routes() -> Vec<Route> {
    use MethodFilter as M;
    [
        ("GenerateAuthData", M::POST, "/{supi_or_suci}/security-information/generate-auth-data"),
        ("GetRgAuthData", M::GET, "/{supi_or_suci}/security-information-rg"),
        ("ConfirmAuth", M::POST, "/{supi_or_suci}/auth-events"),
        ("DeleteAuth", M::PUT, "/{supi_or_suci}/auth-events/{auth_event_id}"),
    ]
    .into_iter()
    .map(|(name, method, pattern)| Route::new(name, method, pattern, handle_not_implemented))
    .collect()
}

fn ue_context_management_routes() -> Vec<Route> {
    use MethodFilter as M;
    [
        ("GetRegistrations", M::GET, "/{ue_id}/registrations"),
        ("Registration", M::PUT, "/{ue_id}/registrations/amf-3gpp-access"),
        ("Get3GppRegistration", M::GET, "/{ue_id}/registrations/amf-3gpp-access"),
        ("Update3GppRegistration", M::PATCH, "/{ue_id}/registrations/amf-3gpp-access"),
        ("RegistrationNon3gpp", M::PUT, "/{ue_id}/registrations/amf-non-3gpp-access"),
        ("GetNon3GppRegistration", M::GET, "/{ue_id}/registrations/amf-non-3gpp-access"),
        ("UpdateNon3GppRegistration", M::PATCH, "/{ue_id}/registrations/amf-non-3gpp-access"),
        ("SmfRegistration", M::PUT, "/{ue_id}/registrations/smf-registrations/{pdu_session_id}"),
        ("SmfDeregistration", M::DELETE, "/{ue_id}/registrations/smf-registrations/{pdu_session_id}"),
        ("GetSmfRegistration", M::GET, "/{ue_id}/registrations/smf-registrations"),
    ]
    .into_iter()
    .map(|(name, method, pattern)| Route::new(name, method, pattern, handle_not_implemented))
    .collect()
}

fn subscriber_data_management_routes() -> Vec<Route> {
    use MethodFilter as M;
    [
        ("GetDataSets", M::GET, "/{supi}"),
        ("GetSharedData", M::GET, "/shared-data"),
        ("GetAmData", M::GET, "/{supi}/am-data"),
        ("Info", M::PUT, "/{supi}/am-data/sor-ack"),
        ("GetSmfSelectData", M::GET, "/{supi}/smf-select-data"),
        ("GetSmData", M::GET, "/{supi}/sm-data"),
        ("GetNssai", M::GET, "/{supi}/nssai"),
        ("GetUeContextInSmfData", M::GET, "/{supi}/ue-context-in-smf-data"),
        ("GetTraceData", M::GET, "/{supi}/trace-data"),
        ("GetIdTranslationResult", M::GET, "/{supi}/id-translation-result"),
        ("Subscribe", M::POST, "/{supi}/sdm-subscriptions"),
        ("Unsubscribe", M::DELETE, "/{supi}/sdm-subscriptions/{subscription_id}"),
        ("Modify", M::PATCH, "/{supi}/sdm-subscriptions/{subscription_id}"),
    ]
    .into_iter()
    .map(|(name, method, pattern)| Route::new(name, method, pattern, handle_not_implemented))
    .collect()
}

fn parameter_provision_routes() -> Vec<Route> {
    use MethodFilter as M;
    [
        ("Update", M::PATCH, "/{ue_id}/pp-data"),
        ("Create5GVnGroup", M::PUT, "/5g-vn-groups/{ext_group_id}"),
        ("Get5GVnGroup", M::GET, "/5g-vn-groups/{ext_group_id}"),
        ("Modify5GVnGroup", M::PATCH, "/5g-vn-groups/{ext_group_id}"),
        ("Delete5GVnGroup", M::DELETE, "/5g-vn-groups/{ext_group_id}"),
    ]
    .into_iter()
    .map(|(name, method, pattern)| Route::new(name, method, pattern, handle_not_implemented))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_callbacks_are_ungated() {
        let groups = route_groups(&ServicePrefixes::default());
        let ungated: Vec<_> = groups
            .iter()
            .filter(|g| g.service.is_none())
            .map(|g| g.prefix.as_str())
            .collect();
        assert_eq!(ungated, vec!["/nudm-callback/v1"]);

        let gated: std::collections::HashSet<_> =
            groups.iter().filter_map(|g| g.service).collect();
        assert_eq!(gated.len(), ServiceName::ALL.len());
    }

    #[test]
    fn ee_group_carries_subscription_crud() {
        let groups = route_groups(&ServicePrefixes::default());
        let ee = groups
            .iter()
            .find(|g| g.service == Some(ServiceName::NudmEe))
            .unwrap();
        let names: Vec<_> = ee.routes.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["CreateEeSubscription", "DeleteEeSubscription", "UpdateEeSubscription"]
        );
    }
}

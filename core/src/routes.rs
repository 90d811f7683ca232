//! Static route table for the admin views.
//!
//! The host navigation component consumes this table; rendering and history
//! handling live there. `resolve` maps a location to the first matching route
//! and extracts `:name` segments as parameters. `href` does the reverse for
//! named navigation.

/// Views a route can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Products,
    ProductCreate,
    ProductDetails,
    Customers,
    CustomerCreate,
    CustomerDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    /// Pass path parameters to the view as named props.
    pub props: bool,
}

/// Ordered: literal paths precede the `:id` pattern that would also match them.
pub const ROUTES: &[Route] = &[
    Route { path: "/", name: "home", view: View::Home, props: false },
    Route { path: "/produtos", name: "produtos", view: View::Products, props: false },
    Route { path: "/produtos/cadastrar", name: "produtos-cadastrar", view: View::ProductCreate, props: false },
    Route { path: "/produtos/:id", name: "produto-detalhes", view: View::ProductDetails, props: true },
    Route { path: "/clientes", name: "clientes", view: View::Customers, props: false },
    Route { path: "/clientes/cadastrar", name: "clientes-cadastrar", view: View::CustomerCreate, props: false },
    Route { path: "/clientes/:id", name: "cliente-detalhes", view: View::CustomerDetails, props: true },
];

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'static Route,
    pub params: Vec<(&'static str, &'a str)>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

/// First route matching `location`. Query string and fragment are ignored.
pub fn resolve(location: &str) -> Option<RouteMatch<'_>> {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let parts: Vec<&str> = segments(path).collect();

    ROUTES.iter().find_map(|route| {
        let pattern: Vec<&'static str> = segments(route.path).collect();
        if pattern.len() != parts.len() {
            return None;
        }
        let mut params = Vec::new();
        for (expected, actual) in pattern.iter().copied().zip(parts.iter().copied()) {
            match expected.strip_prefix(':') {
                Some(name) => params.push((name, actual)),
                None if expected == actual => {}
                None => return None,
            }
        }
        Some(RouteMatch { route, params })
    })
}

pub fn route_by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.name == name)
}

/// Build the path for a named route. Returns `None` for an unknown name or a
/// missing parameter.
pub fn href(name: &str, params: &[(&str, &str)]) -> Option<String> {
    let route = route_by_name(name)?;
    let mut path = String::new();
    for segment in segments(route.path) {
        let value = match segment.strip_prefix(':') {
            Some(param) => params.iter().find(|(k, _)| *k == param).map(|(_, v)| *v)?,
            None => segment,
        };
        path.push('/');
        path.push_str(value);
    }
    if path.is_empty() {
        path.push('/');
    }
    Some(path)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

use maud::{html, Markup};

use crate::templates::layouts::{base, PageConfig};

/// Routes listed on the home page, with what each one returns
const ROUTES: &[(&str, &str)] = &[
    (
        "/api/v1.0/precipitation",
        "Precipitation per date over the last year of data",
    ),
    ("/api/v1.0/stations", "Codes of every reporting station"),
    (
        "/api/v1.0/tobs",
        "Last year of temperature observations at the most active station",
    ),
    (
        "/api/v1.0/<start>",
        "TMIN, TAVG and TMAX from a start date (YYYY-MM-DD) onwards",
    ),
    (
        "/api/v1.0/<start>/<end>",
        "TMIN, TAVG and TMAX between two dates, inclusive",
    ),
];

pub fn home_page(api_base: &str) -> Markup {
    let config = PageConfig {
        title: "Climate API",
        api_base,
    };

    base(&config, content(api_base))
}

fn content(api_base: &str) -> Markup {
    html! {
        h2 class="subtitle" { "Available Routes:" }
        table class="table is-striped is-fullwidth" {
            thead {
                tr {
                    th { "Route" }
                    th { "Returns" }
                }
            }
            tbody {
                @for (route, description) in ROUTES {
                    tr {
                        td {
                            @if route.contains('<') {
                                code { (api_base) (route) }
                            } @else {
                                a href={ (api_base) (route) } { code { (api_base) (route) } }
                            }
                        }
                        td { (description) }
                    }
                }
            }
        }
    }
}

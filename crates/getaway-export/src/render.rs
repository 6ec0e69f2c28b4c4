use serde::Serialize;
use tera::{Context, Tera};

use getaway_core::models::trip::{DayEntry, TripRecord};

use crate::error::ExportError;
use crate::template::{Node, Template};

/// Name of the repeated block that expands to the day-by-day itinerary.
pub const DAILY_ITINERARY: &str = "dailyItinerary";

/// Day content longer than this (title + description, in characters)
/// always starts on a fresh page.
pub const LONG_DAY_THRESHOLD: usize = 500;

const DAY: &str = "day.html";
const PAGE_BREAK: &str = "page_break.html";

const DAY_TEMPLATE: &str = r#"
          <div class="day-item" style="page-break-inside: avoid;">
            <div class="day-number">Day {{ day.number }}</div>
            {%- if day.title %}
            <div class="day-title">{{ day.title }}</div>
            {%- endif %}
            {%- if day.description %}
            <div class="day-description">{{ day.description | escape | linebreaksbr | safe }}</div>
            {%- endif %}
          </div>
"#;

const PAGE_BREAK_TEMPLATE: &str = r#"
            <div style="page-break-before: always; padding-top: 20px;">
              {%- if logo %}
              <img src="{{ logo }}" alt="Company Logo" style="max-width: 180px; max-height: 60px; object-fit: contain; margin-bottom: 20px; display: block;">
              {%- endif %}
            </div>
"#;

#[derive(Serialize)]
struct DayView<'a> {
    number: u32,
    title: &'a str,
    description: &'a str,
}

/// Renders the itinerary HTML template for one trip.
///
/// The per-day markup lives in Tera fragments compiled once at
/// construction; the outer template is parsed with [`Template`] on every
/// call since it is read fresh per request.
pub struct ItineraryRenderer {
    tera: Tera,
}

impl ItineraryRenderer {
    pub fn new() -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![(DAY, DAY_TEMPLATE), (PAGE_BREAK, PAGE_BREAK_TEMPLATE)])
            .map_err(|e| ExportError::TemplateParse(e.to_string()))?;
        Ok(Self { tera })
    }

    /// Fill `template` with `trip`. `logo` is the resolved public logo URL,
    /// if one is available.
    pub fn render(
        &self,
        template: &str,
        trip: &TripRecord,
        logo: Option<&str>,
    ) -> Result<String, ExportError> {
        let parsed = Template::parse(template);
        let scope = Scope { trip, logo };
        let mut out = String::with_capacity(template.len());
        self.render_nodes(parsed.nodes(), &scope, &mut out)?;
        Ok(out)
    }

    fn render_nodes(
        &self,
        nodes: &[Node<'_>],
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), ExportError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Var(name) => {
                    let value = scope.scalar(name).unwrap_or_default();
                    out.push_str(&tera::escape_html(&value));
                }
                Node::Each { name, .. } => {
                    // The block body is a designer placeholder; the days
                    // are always rendered from the fixed fragments.
                    if *name == DAILY_ITINERARY {
                        self.render_days(scope, out)?;
                    }
                }
                Node::If {
                    name,
                    then,
                    otherwise,
                } => {
                    let branch = if scope.truthy(name) { then } else { otherwise };
                    self.render_nodes(branch, scope, out)?;
                }
            }
        }
        Ok(())
    }

    fn render_days(&self, scope: &Scope<'_>, out: &mut String) -> Result<(), ExportError> {
        let days = &scope.trip.daily_itinerary;
        if !days.is_empty() {
            tracing::debug!(days = days.len(), "rendering daily itinerary");
        }

        for (index, day) in days.iter().enumerate() {
            if needs_logo_break(index, day.content_length()) {
                tracing::debug!(day = day.day_number, index, "adding logo before day");
                let mut ctx = Context::new();
                ctx.insert("logo", &scope.logo);
                out.push_str(&self.tera.render(PAGE_BREAK, &ctx)?);
            }
            out.push_str(&self.render_day(day)?);
        }
        Ok(())
    }

    fn render_day(&self, day: &DayEntry) -> Result<String, ExportError> {
        let mut ctx = Context::new();
        ctx.insert(
            "day",
            &DayView {
                number: day.day_number,
                title: day.title(),
                description: day.description(),
            },
        );
        Ok(self.tera.render(DAY, &ctx)?)
    }
}

/// Whether the day at `index` should start a new page on layout grounds:
/// long content, or every third day after the first.
pub fn should_page_break(index: usize, content_length: usize) -> bool {
    content_length > LONG_DAY_THRESHOLD || (index > 0 && index % 3 == 0)
}

/// Whether a forced page break plus logo precedes the day at `index`.
///
/// Every even-indexed day after the first gets one as well, on top of
/// [`should_page_break`]. The first day never does.
pub fn needs_logo_break(index: usize, content_length: usize) -> bool {
    index > 0 && (should_page_break(index, content_length) || index % 2 == 0)
}

/// Placeholder lookups for one render.
struct Scope<'a> {
    trip: &'a TripRecord,
    logo: Option<&'a str>,
}

impl Scope<'_> {
    /// String value for a scalar placeholder. Unknown names have none.
    fn scalar(&self, name: &str) -> Option<String> {
        let trip = self.trip;
        match name {
            "customerName" => trip.customer_name.clone(),
            "destination" => trip.destination.clone(),
            "startDate" => trip.start_date.clone(),
            "endDate" => trip.end_date.clone(),
            "adultsCount" => Some(trip.adults_count().to_string()),
            "childrenCount" => Some(trip.children_count().to_string()),
            "duration" => trip.duration.map(|d| d.to_string()),
            "tripId" => trip.trip_id.clone(),
            "totalPrice" => trip.total_price.map(|p| p.to_string()),
            "inclusions" => trip.inclusions.clone(),
            "exclusions" => trip.exclusions.clone(),
            "additionalNotes" => trip.additional_notes.clone(),
            "companyLogo" => self.logo.map(str::to_string),
            _ => None,
        }
    }

    fn truthy(&self, name: &str) -> bool {
        let trip = self.trip;
        match name {
            "adultsCount" => trip.adults_count() > 0,
            "childrenCount" => trip.children_count() > 0,
            "duration" => trip.duration.is_some_and(|d| d > 0),
            "totalPrice" => trip.total_price.is_some_and(|p| p != 0.0),
            DAILY_ITINERARY => !trip.daily_itinerary.is_empty(),
            _ => self.scalar(name).is_some_and(|v| !v.is_empty()),
        }
    }
}

//! Query window builder.
//!
//! Turns caller-facing time range parameters into the fragments a time-series
//! query is assembled from: the window bounds, the aggregation function, the
//! `GROUP BY time(..)` interval and the fill policy. Nothing here executes a query.

use serde::{Deserialize, Serialize};

/// Grouping interval used when nothing better is known.
pub const DEFAULT_SCALE: &str = "15m";

/// Raw values, no aggregation.
pub const FN_RAW: &str = "raw";
/// Mean aggregation.
pub const FN_MEAN: &str = "mean";
/// Last value aggregation.
pub const FN_LAST: &str = "last";

/// Fill empty intervals with the previous value.
pub const FILL_PREVIOUS: &str = "previous";
/// Fill empty intervals by linear interpolation.
pub const FILL_LINEAR: &str = "linear";
/// Leave empty intervals out.
pub const FILL_NONE: &str = "none";
/// Fill empty intervals with zero.
pub const FILL_ZERO: &str = "0";

/// Time range parameters as a caller supplies them.
///
/// Either an absolute window (`start`/`end` in epoch seconds) or a relative one
/// (`last`, e.g. `"24h"`, optionally anchored at `start`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Window start in epoch seconds, 0 when unset.
    pub start: i64,
    /// Window end in epoch seconds.
    pub end: i64,
    /// Explicit grouping interval.
    pub scale: String,
    /// Relative window length such as `"1h"` or `"7d"`.
    pub last: String,
    /// Fill policy.
    pub fill: String,
    /// Aggregation function.
    #[serde(rename = "fn")]
    pub function: String,
}

/// Query fragments derived from [`Params`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryWindow {
    /// Lower time bound expression.
    pub start: String,
    /// Aggregation function.
    #[serde(rename = "fn")]
    pub function: String,
    /// Upper time bound expression.
    pub end: String,
    /// Grouping interval.
    pub group: String,
    /// Fill policy.
    pub fill: String,
}

/// Builds the query fragments for a time range.
///
/// ```rust
/// use pointmap::query::{Params, time_range};
///
/// let window = time_range(&Params { last: "24h".to_string(), ..Params::default() });
/// assert_eq!(window.start, "now() - 24h");
/// assert_eq!(window.end, "now()");
/// assert_eq!(window.group, "1h");
/// assert_eq!(window.fill, "previous");
/// assert_eq!(window.function, "mean");
/// ```
pub fn time_range(params: &Params) -> QueryWindow {
    let fill = fill_policy(&params.fill);
    let function = aggregate_function(&params.function).to_string();

    if params.last.is_empty() && params.start != 0 {
        return QueryWindow {
            start: format!("{}s", params.start),
            function,
            end: format!("{}s", params.end),
            group: scale_or(&params.scale, DEFAULT_SCALE),
            fill,
        };
    }

    let (start, end) = if params.start == 0 {
        (format!("now() - {}", params.last), "now()".to_string())
    } else {
        (
            format!("{}s - {}", params.start, params.last),
            format!("{}s", params.start),
        )
    };
    QueryWindow {
        start,
        function,
        end,
        group: scale_or(&params.scale, default_scale(&params.last)),
        fill,
    }
}

fn scale_or(scale: &str, fallback: &str) -> String {
    if scale.is_empty() {
        fallback.to_string()
    } else {
        scale.to_string()
    }
}

fn fill_policy(fill: &str) -> String {
    if fill.is_empty() {
        FILL_PREVIOUS.to_string()
    } else {
        fill.to_string()
    }
}

/// Normalizes an aggregation function name. Unknown names fall back to mean.
pub fn aggregate_function(name: &str) -> &'static str {
    match name {
        "last" => FN_LAST,
        _ => FN_MEAN,
    }
}

/// Returns the grouping interval that suits a relative window length.
pub fn default_scale(last: &str) -> &'static str {
    match last {
        "1h" | "3h" | "6h" | "12h" => "15m",
        "24h" | "1d" => "1h",
        "2d" => "2h",
        "7d" => "12h",
        "30d" => "1d",
        "90d" => "1w",
        _ => DEFAULT_SCALE,
    }
}

/// Builds a regex literal matching any of `values`: `/a|b|c/`.
pub fn in_regex<S: AsRef<str>>(values: &[S]) -> String {
    let parts: Vec<&str> = values.iter().map(|value| value.as_ref()).collect();
    format!("/{}/", parts.join("|"))
}

/// Builds an OR chain of equality tests: `code = 'A' OR code = 'B'`.
pub fn in_or<S: AsRef<str>>(column: &str, values: &[S]) -> String {
    values
        .iter()
        .map(|value| format!("{column} = '{}'", value.as_ref()))
        .collect::<Vec<_>>()
        .join(" OR ")
}

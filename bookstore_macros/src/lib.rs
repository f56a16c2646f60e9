mod thing;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Thing)] derive macro
// ============================================================================

/// Derive macro for the `Thing` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Thing)]
/// #[thing(namespace = "books")]
/// struct Book {
///     #[thing(id)]
///     pub id: Id,
///     pub title: Option<String>,
/// }
/// ```
///
/// - `#[thing(namespace = "...")]` sets the key namespace, the prefix the
///   store scans by. If omitted, defaults to snake_case struct name + "s".
/// - `#[thing(id)]` marks the `Id` field that keys the record.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Thing, attributes(thing))]
pub fn derive_thing(input: TokenStream) -> TokenStream {
    thing::derive_thing(input)
}

//! Path-variable substitution for URL templates such as `/api/users/:id/posts/:post_id`.
//!
//! A placeholder is a `:` immediately followed by an identifier (`[A-Za-z_][A-Za-z0-9_]*`). Each
//! placeholder is replaced with the value mapped to its own name; placeholders without a mapping
//! stay literal. A colon followed by anything else (a port number, `//` after a scheme) is left
//! untouched.

// self
use crate::_prelude::*;

/// Values substituted into `:name` placeholders, keyed by placeholder name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathVariables(BTreeMap<String, String>);
impl PathVariables {
	/// Creates an empty variable map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces the value for `name`.
	pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
		self.insert(name, value);

		self
	}

	/// Adds or replaces the value for `name`.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
		self.0.insert(name.into(), value.to_string());
	}

	/// Returns the value mapped to `name`, if any.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Returns `true` when no variables are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for PathVariables
where
	K: Into<String>,
	V: Display,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut vars = Self::new();

		for (name, value) in iter {
			vars.insert(name, value);
		}

		vars
	}
}

/// Replaces every `:name` placeholder in `template` with its mapped value.
pub fn substitute_path(template: &str, vars: &PathVariables) -> String {
	if vars.is_empty() || !template.contains(':') {
		return template.to_owned();
	}

	let mut out = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(idx) = rest.find(':') {
		out.push_str(&rest[..idx]);

		let after = &rest[idx + 1..];
		let name_len = identifier_len(after);

		if name_len == 0 {
			out.push(':');
			rest = after;

			continue;
		}

		let name = &after[..name_len];

		match vars.get(name) {
			Some(value) => out.push_str(value),
			None => {
				out.push(':');
				out.push_str(name);
			},
		}

		rest = &after[name_len..];
	}

	out.push_str(rest);

	out
}

/// Length in bytes of the identifier at the start of `s`, or `0` if there is none.
fn identifier_len(s: &str) -> usize {
	let mut chars = s.char_indices();

	match chars.next() {
		Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {},
		_ => return 0,
	}

	chars
		.find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
		.map(|(idx, _)| idx)
		.unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn each_placeholder_gets_its_own_value() {
		let vars = PathVariables::new().with("id", "1").with("name", "2");

		assert_eq!(substitute_path("/api/:id/:name", &vars), "/api/1/2");
		assert_eq!(substitute_path("/api/:name/:id", &vars), "/api/2/1");
	}

	#[test]
	fn numeric_values_are_formatted() {
		let vars: PathVariables = [("user_id", 42)].into_iter().collect();

		assert_eq!(substitute_path("/users/:user_id/posts", &vars), "/users/42/posts");
	}

	#[test]
	fn unmapped_placeholders_stay_literal() {
		let vars = PathVariables::new().with("id", "7");

		assert_eq!(substitute_path("/api/:id/:missing", &vars), "/api/7/:missing");
	}

	#[test]
	fn templates_without_placeholders_are_unchanged() {
		let vars = PathVariables::new().with("id", "7");

		assert_eq!(substitute_path("/api/items", &vars), "/api/items");
		assert_eq!(substitute_path("/api/:id", &PathVariables::new()), "/api/:id");
	}

	#[test]
	fn placeholders_match_whole_identifiers_only() {
		let vars = PathVariables::new().with("id", "1").with("identifier", "abc");

		assert_eq!(substitute_path("/x/:identifier/:id.json", &vars), "/x/abc/1.json");
	}

	#[test]
	fn ports_and_schemes_are_not_placeholders() {
		let vars = PathVariables::new().with("id", "9");

		assert_eq!(
			substitute_path("http://localhost:8080/api/:id", &vars),
			"http://localhost:8080/api/9"
		);
		assert_eq!(substitute_path("/trailing:", &vars), "/trailing:");
	}

	#[test]
	fn repeated_placeholders_are_all_replaced() {
		let vars = PathVariables::new().with("id", "5");

		assert_eq!(substitute_path("/:id/children/:id", &vars), "/5/children/5");
	}
}

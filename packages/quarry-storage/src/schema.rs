pub fn render_schema() -> String {
	include_str!("../../../sql/init.sql").to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_creates_both_relations() {
		let sql = render_schema();

		assert!(sql.contains("CREATE TABLE IF NOT EXISTS content "));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS content_chunk "));
	}
}

use super::escape_html;

/// Admin page: CSV import and test-data generation.
pub fn render(base: &str, test_data_count: usize) -> String {
    format!(
        "<h1>Admin</h1>\
         <h2>Import Participants</h2>\
         <p>Paste CSV with a header line, then one participant per line: \
         teamNumber,teamName,firstName,lastName,grade,schoolName,category,arrivalTime</p>\
         <form method=\"post\" action=\"{import}\">\
         <textarea id=\"csv-input\" name=\"csv\" rows=\"10\" cols=\"80\"></textarea>\
         <button type=\"submit\" id=\"import-csv\">Import CSV</button></form>\
         <h2>Test Data</h2>\
         <form method=\"post\" action=\"{generate}\">\
         <input type=\"number\" name=\"count\" min=\"1\" max=\"1000\" value=\"{test_data_count}\">\
         <button type=\"submit\" id=\"generate-test-data\">Generate Test Data</button></form>",
        import = escape_html(&format!("{base}/admin/import")),
        generate = escape_html(&format!("{base}/admin/test-data")),
    )
}

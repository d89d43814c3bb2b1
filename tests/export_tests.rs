//! Export module tests

use tmdl_er_sdk::export::{DiagramOptions, DotExporter, JsonExporter};
use tmdl_er_sdk::import::TmdlImporter;
use tmdl_er_sdk::models::SchemaGraph;

fn imported_graph() -> SchemaGraph {
    let blocks = [
        "table Sales\n\tcolumn OrderKey\n\tcolumn CustomerKey\n\tcolumn 'Order Date'\n",
        "table Customer\n\tcolumn CustomerKey\n\tcolumn Name\n",
        "relationship r1\n\tfromColumn: Sales.CustomerKey\n\ttoColumn: Customer.CustomerKey\n\
         relationship r2\n\tfromColumn: Sales.ProductKey\n\ttoColumn: Product.ProductKey\n",
    ];
    TmdlImporter::new().import(&blocks).graph
}

mod dot_export_tests {
    use super::*;

    #[test]
    fn test_every_table_and_edge_rendered() {
        let content = DotExporter::new().export(&imported_graph()).unwrap().content;

        assert!(content.contains("\"Sales\" [label=<"));
        assert!(content.contains("\"Customer\" [label=<"));
        assert!(content.contains("PORT=\"c2\">Order Date</TD>"));
        assert!(content.contains("\"Sales\":\"c1\" -> \"Customer\":\"c0\""));
        assert_eq!(content.matches(" -> ").count(), 2);
    }

    #[test]
    fn test_unknown_table_gets_placeholder() {
        let content = DotExporter::new().export(&imported_graph()).unwrap().content;
        assert_eq!(content.matches("style=\"dashed\"").count(), 1);
        assert!(content.contains("\"Sales\" -> \"Product\""));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Model_ERDiagram.dot");
        let options = DiagramOptions::default().with_layout_engine("neato");

        DotExporter::with_options(options)
            .export(&imported_graph())
            .unwrap()
            .write_to(&path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("layout=\"neato\""));
    }
}

mod json_export_tests {
    use super::*;

    #[test]
    fn test_json_round_trip_preserves_graph() {
        let graph = imported_graph();
        let result = JsonExporter::new().export(&graph).unwrap();
        assert_eq!(result.format, "json");

        let parsed: SchemaGraph = serde_json::from_str(&result.content).unwrap();
        assert_eq!(parsed, graph);
    }
}

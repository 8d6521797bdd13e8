//! Pipeline tests: split, parse and total on realistic AI responses.

use super::*;

const CUSTOMER_MD: &str = "\
# COTIZACIÓN DE MATERIALES

## Características
Cemento gris CPC 30R en sacos de 50 kg.
- Entrega en obra

| Descripción | Unidad | Cantidad | Precio Unitario | Importe |
|-------------|--------|----------|-----------------|---------|
| Cemento gris CPC 30R\\nSaco 50 kg | saco | 10 | $10.00 | $100.00 |
| Arena de río | m3 | 1 | $50.50 | $50.50 |

**Notas:**
- Precios más IVA.
- Vigencia de 15 días
  a partir de la fecha de emisión.
- Precios sujetos a disponibilidad.
";

const INTERNAL_MD: &str = "\
# Cotización interna

| Descripción | Proveedor | Costo Unitario | Margen | Precio Unitario | Cantidad | Importe |
|---|---|---|---|---|---|---|
| Cemento gris | Cemex | $8.00 | 25% | $10.00 | 10 | $100.00 |
| Arena de río | Local | $40.00 | 26% | $50.50 | 1 | $50.50 |

- Margen promedio 25%
";

fn dual(internal: &str, customer: &str) -> String {
    format!(
        "Claro, aquí está la cotización.\n\n<!-- INTERNAL_QUOTATION_START -->\n{}\n<!-- INTERNAL_QUOTATION_END -->\n\n<!-- CUSTOMER_QUOTATION_START -->\n{}\n<!-- CUSTOMER_QUOTATION_END -->\n",
        internal, customer
    )
}

#[test]
fn empty_input_yields_empty_document() {
    let parsed = parse_quotation("");
    assert_eq!(parsed, ParsedQuotation::default());
    assert!(parsed.title.is_none());
    assert!(!parsed.has_table);
}

#[test]
fn customer_document_structure() {
    let parsed = parse_quotation(CUSTOMER_MD);
    assert_eq!(parsed.title.as_deref(), Some("COTIZACIÓN DE MATERIALES"));
    assert!(parsed.has_table);
    assert_eq!(parsed.tables.len(), 1);
    assert_eq!(parsed.tables[0].len(), 2);

    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].title.as_deref(), Some("Características"));
    assert_eq!(
        parsed.sections[0].content,
        vec![
            "Cemento gris CPC 30R en sacos de 50 kg.".to_string(),
            "- Entrega en obra".to_string()
        ]
    );

    let first = &parsed.tables[0][0];
    assert_eq!(first.descripcion, "Cemento gris CPC 30R\\nSaco 50 kg");
    assert_eq!(first.unidad, "saco");
    assert_eq!(first.cantidad, "10");
    assert_eq!(first.precio_unitario, "$10.00");
    assert_eq!(first.importe, "$100.00");
}

#[test]
fn notes_are_one_entry_per_logical_note() {
    let parsed = parse_quotation(CUSTOMER_MD);
    assert_eq!(
        parsed.notes,
        vec![
            "Precios más IVA.".to_string(),
            "Vigencia de 15 días a partir de la fecha de emisión.".to_string(),
            "Precios sujetos a disponibilidad.".to_string(),
        ]
    );
}

#[test]
fn two_row_table_totals_150_50() {
    let parsed = parse_quotation(CUSTOMER_MD);
    assert_eq!(parsed.tables[0].len(), 2);
    assert_eq!(parsed.total(), 150.50);
    assert!(amount_in_words(parsed.total()).contains("ciento cincuenta pesos 50/100"));
}

#[test]
fn no_pipe_rows_means_no_table() {
    let parsed = parse_quotation("# Hola\n\nNo tengo precios para ese material.\n\n## Sugerencia\nConsulta con ventas.");
    assert!(!parsed.has_table);
    assert!(parsed.tables.is_empty());
    assert_eq!(parsed.title.as_deref(), Some("Hola"));
    assert_eq!(parsed.sections.len(), 2);
    assert_eq!(parsed.sections[0].title, None);
    assert_eq!(parsed.sections[1].title.as_deref(), Some("Sugerencia"));
}

#[test]
fn header_only_table_is_not_a_table() {
    let parsed = parse_quotation("| Descripción | Importe |\n|---|---|\n\nSin partidas.");
    assert!(!parsed.has_table);
    assert!(parsed.tables.is_empty());
}

#[test]
fn multiple_tables_and_section_between() {
    let md = "\
# Cotización
| Concepto | Importe |
|---|---|
| Block 15x20 | $1,000.00 |

## Opción B
Material alternativo.

| Concepto | Importe |
|---|---|
| Block 12x20 | $800.00 |
| Mortero | $200.00 |
";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables.len(), 2);
    assert_eq!(parsed.tables[1].len(), 2);
    assert_eq!(parsed.total(), 1000.0);
    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].title.as_deref(), Some("Opción B"));
    assert_eq!(parsed.sections[0].content, vec!["Material alternativo.".to_string()]);
    assert!(parsed.notes.is_empty());
}

#[test]
fn blank_line_splits_table_blocks() {
    let md = "| Concepto | Importe |\n|---|---|\n| A | $1.00 |\n\n| B | $2.00 |";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables.len(), 2);
    // The second block has no header row of its own: it keeps the first block's columns.
    assert_eq!(parsed.tables[1][0].descripcion, "B");
    assert_eq!(parsed.tables[1][0].importe, "$2.00");
    assert!(parsed.tables[1][0].unidad.is_empty());
}

#[test]
fn headerless_block_of_other_width_maps_by_position() {
    let md = "| Concepto | Importe |\n|---|---|\n| A | $1.00 |\n\n| B | m3 | 2 | $5.00 | $10.00 |";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables[1][0].unidad, "m3");
    assert_eq!(parsed.tables[1][0].importe, "$10.00");
}

#[test]
fn text_between_tables_is_section_content() {
    let md = "\
| Block hueco 15 | $1.00 |

Opción alternativa con block hueco:

| Block hueco 12 | $2.00 |
- Precios más IVA
";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables.len(), 2);
    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].title, None);
    assert_eq!(
        parsed.sections[0].content,
        vec!["Opción alternativa con block hueco:".to_string()]
    );
    assert_eq!(parsed.notes, vec!["Precios más IVA".to_string()]);
}

#[test]
fn note_heading_after_last_table_keeps_notes() {
    let md = "\
# COTIZACIÓN
| Concepto | Importe |
|---|---|
| Grava | $700.00 |

### Notas importantes
- Precios más IVA
- Vigencia 15 días
";
    let parsed = parse_quotation(md);
    assert!(parsed.sections.is_empty());
    assert_eq!(
        parsed.notes,
        vec!["Precios más IVA".to_string(), "Vigencia 15 días".to_string()]
    );
}

#[test]
fn conditions_heading_between_tables_stays_a_section() {
    let md = "\
| Concepto | Importe |
|---|---|
| Grava | $700.00 |
## Condiciones de entrega
Entrega en 48 horas.
| Concepto | Importe |
|---|---|
| Arena | $300.00 |
";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables.len(), 2);
    assert!(parsed.notes.is_empty());
    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].title.as_deref(), Some("Condiciones de entrega"));
    assert_eq!(parsed.sections[0].content, vec!["Entrega en 48 horas.".to_string()]);
}

#[test]
fn item_number_column_does_not_take_description() {
    let md = "\
| Partida | Descripción | Cantidad | Importe |
|---|---|---|---|
| 1 | Cemento gris | 10 | $100.00 |
";
    let parsed = parse_quotation(md);
    let item = &parsed.tables[0][0];
    assert_eq!(item.descripcion, "Cemento gris");
    assert_eq!(item.cantidad, "10");
    assert_eq!(item.importe, "$100.00");
}

#[test]
fn positional_fallback_without_header() {
    let md = "| Varilla 3/8 | pza | 20 | $95.00 | $1,900.00 |\n| Alambre | kg | 5 | $30.00 | $150.00 |";
    let parsed = parse_quotation(md);
    assert!(parsed.has_table);
    assert_eq!(parsed.tables[0].len(), 2);
    assert_eq!(parsed.tables[0][0].importe, "$1,900.00");
    assert_eq!(parsed.total(), 2050.0);
}

#[test]
fn data_row_with_header_like_description_is_data() {
    let md = "| Material de construcción | lote | 1 | $500.00 | $500.00 |";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables[0].len(), 1);
    assert_eq!(parsed.tables[0][0].descripcion, "Material de construcción");
}

#[test]
fn summary_rows_are_not_line_items() {
    let md = "\
| Descripción | Cantidad | Importe |
|---|---|---|
| Grava | 2 | $700.00 |
| | **Total** | **$700.00** |
| **TOTAL** | | $700.00 |
";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables[0].len(), 1);
    assert_eq!(parsed.total(), 700.0);
}

#[test]
fn malformed_amount_contributes_zero() {
    let md = "| Concepto | Importe |\n|---|---|\n| Tubo PVC | $abc |\n| Codo | $25.00 |\n| Pegamento | Consultar |";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.tables[0].len(), 3);
    assert_eq!(parsed.total(), 25.0);
}

#[test]
fn customer_variant_drops_internal_columns() {
    let parsed = parse_quotation(INTERNAL_MD);
    let item = &parsed.tables[0][0];
    assert_eq!(item.descripcion, "Cemento gris");
    assert_eq!(item.precio_unitario, "$10.00");
    assert_eq!(item.cantidad, "10");
    assert!(item.unidad.is_empty());
}

#[test]
fn internal_variant_maps_supplier_columns() {
    let parsed = parse_internal_quotation(INTERNAL_MD);
    assert_eq!(parsed.title.as_deref(), Some("Cotización interna"));
    let item = &parsed.tables[0][1];
    assert_eq!(item.descripcion, "Arena de río");
    assert_eq!(item.proveedor, "Local");
    assert_eq!(item.costo_unitario, "$40.00");
    assert_eq!(item.margen, "26%");
    assert_eq!(item.precio_unitario, "$50.50");
    assert_eq!(item.cantidad, "1");
    assert_eq!(item.importe, "$50.50");
    assert_eq!(parsed.total(), 150.50);
    assert_eq!(parsed.notes, vec!["Margen promedio 25%".to_string()]);
}

#[test]
fn heading_after_table_opens_section_not_note() {
    let md = "# T\n| Concepto | Importe |\n|---|---|\n| A | $1.00 |\nNota suelta\n## Cierre\nGracias por su preferencia.";
    let parsed = parse_quotation(md);
    assert_eq!(parsed.notes, vec!["Nota suelta".to_string()]);
    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].title.as_deref(), Some("Cierre"));
    assert_eq!(
        parsed.sections[0].content,
        vec!["Gracias por su preferencia.".to_string()]
    );
}

#[test]
fn split_then_parse_matches_direct_parse() {
    let raw = dual(INTERNAL_MD, CUSTOMER_MD);
    let result = split_dual_response(&raw);

    let customer = result.customer.expect("customer side");
    let direct = parse_quotation(CUSTOMER_MD);
    assert_eq!(customer.tables, direct.tables);
    assert_eq!(customer.sections, direct.sections);

    let internal = result.internal.expect("internal side");
    let direct = parse_internal_quotation(INTERNAL_MD);
    assert_eq!(internal.tables, direct.tables);
    assert_eq!(internal.sections, direct.sections);
}

#[test]
fn customer_only_response() {
    let raw = format!(
        "<!-- CUSTOMER_QUOTATION_START -->\n{}\n<!-- CUSTOMER_QUOTATION_END -->",
        CUSTOMER_MD
    );
    let result = split_dual_response(&raw);
    assert!(result.internal.is_none());
    assert!(result.customer.is_some_and(|c| c.has_table));
}

#[test]
fn parse_is_deterministic() {
    assert_eq!(parse_quotation(CUSTOMER_MD), parse_quotation(CUSTOMER_MD));
}

#[test]
fn serializes_with_camel_case_names() {
    let parsed = parse_quotation(CUSTOMER_MD);
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["hasTable"], true);
    assert_eq!(json["tables"][0][1]["precioUnitario"], "$50.50");

    let result = split_dual_response(&dual(INTERNAL_MD, CUSTOMER_MD));
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["internalMarkdown"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(json["internal"]["tables"][0][0]["costoUnitario"], "$8.00");
}

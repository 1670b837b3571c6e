/// Выгрузка таблиц в CSV для Excel: разделитель `;`, UTF-8 BOM
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const BOM: char = '\u{FEFF}';

/// Строка отчёта, которую можно выгрузить в CSV
pub trait CsvExportable {
    fn headers() -> Vec<&'static str>;

    fn to_csv_row(&self) -> Vec<String>;
}

/// Экранирует CSV ячейку, если она содержит разделитель, кавычки или перевод строки
fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(';') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

pub fn build_csv<T: CsvExportable>(data: &[T]) -> String {
    let mut csv_content = String::new();
    csv_content.push(BOM);
    csv_content.push_str(&T::headers().join(";"));
    csv_content.push('\n');
    for item in data {
        let row: Vec<String> = item
            .to_csv_row()
            .iter()
            .map(|cell| escape_csv_cell(cell))
            .collect();
        csv_content.push_str(&row.join(";"));
        csv_content.push('\n');
    }
    csv_content
}

/// Выгружает строки отчёта и инициирует скачивание
pub fn export_to_csv<T: CsvExportable>(data: &[T], filename: &str) -> Result<(), String> {
    if data.is_empty() {
        return Err("Нет данных для экспорта".to_string());
    }
    download_csv(&build_csv(data), filename)
}

/// Скачивание готового CSV (например, полученного с сервера).
/// BOM добавляется, если его нет.
pub fn download_csv(content: &str, filename: &str) -> Result<(), String> {
    let content = if content.starts_with(BOM) {
        content.to_string()
    } else {
        format!("{}{}", BOM, content)
    };
    let blob = create_csv_blob(&content)?;
    download_blob(&blob, filename)
}

fn create_csv_blob(content: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Инициирует скачивание Blob через временную ссылку
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, usize);

    impl CsvExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Отдел", "Запросов"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_escape_csv_cell() {
        assert_eq!(escape_csv_cell("plain"), "plain");
        assert_eq!(escape_csv_cell("a;b"), "\"a;b\"");
        assert_eq!(escape_csv_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_build_csv_has_bom_and_header() {
        let csv = build_csv(&[Row("Billing; North", 3)]);
        assert!(csv.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines, vec!["Отдел;Запросов", "\"Billing; North\";3"]);
    }
}

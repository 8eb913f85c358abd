//! HTML for the single page. Fragments are plain strings stitched together by
//! the handlers; every user-supplied value goes through `html_escape`.

use base64ct::{Base64, Encoding};
use std::fmt::Display;

use crate::predict::{BatchOutcome, Prediction};
use crate::record::{
    Department, EducationLevel, EmployeeForm, Gender, Location, AGE_RANGE, EMPLOYEE_ID_MAX,
    EXPERIENCE_RANGE, JOB_TITLE_MAX, NAME_MAX,
};
use crate::table::Table;

pub const DOWNLOAD_FILE_NAME: &str = "batch_salary_predictions.csv";

/// Largest CSV embedded as a `data:` link. Base64 grows it by a third, and
/// browsers start refusing URLs around 2 MB.
pub const INLINE_DOWNLOAD_MAX: usize = 1024 * 1024;

/// Sections below the form; empty strings render nothing.
#[derive(Debug, Default)]
pub struct PageParts {
    pub input_preview: String,
    pub single: String,
    pub batch: String,
}

pub fn page(form: &EmployeeForm, parts: &PageParts) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Employee Salary Predictor</title>
    <style>
        body {{ font-family: 'Segoe UI', Roboto, sans-serif; max-width: 960px; margin: 40px auto; padding: 0 20px; color: #000; }}
        fieldset {{ border: 1px solid #e0e0e0; border-radius: 12px; background: #f9f9f9; padding: 13px 19px; margin-bottom: 24px; }}
        .grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 10px 24px; }}
        label {{ display: block; margin-top: 6px; }}
        input, select {{ width: 100%; padding: 8px 10px; border: 1px solid #ccc; border-radius: 6px; box-sizing: border-box; }}
        button {{ margin-top: 12px; padding: 10px 20px; background: #4285f4; color: #fff; border: none; border-radius: 6px; cursor: pointer; }}
        button:hover {{ background: #3367d6; }}
        table {{ border-collapse: collapse; margin: 8px 0; }}
        th, td {{ border: 1px solid #ddd; padding: 4px 8px; text-align: left; }}
        .prediction-result {{ background: #f0f0f0; border-radius: 10px; padding: 18px; margin: 20px auto; max-width: 540px; text-align: center; }}
        .salary {{ font-size: 29px; font-weight: bold; color: #2186ff; }}
        .error {{ background: #fdecea; border-left: 4px solid #d93025; padding: 10px; margin: 12px 0; }}
    </style>
</head>
<body>
    <h1>Employee Salary Predictor</h1>
    <p>Enter employee information below for an instant salary prediction.</p>
{single_form}
{input_preview}
{single}
    <hr>
{batch_form}
{batch}
</body>
</html>
"#,
        single_form = single_form(form),
        input_preview = parts.input_preview,
        single = parts.single,
        batch_form = batch_form(),
        batch = parts.batch,
    )
}

fn single_form(form: &EmployeeForm) -> String {
    format!(
        r#"    <form method="post" action="/predict">
        <fieldset>
            <legend>Employee Details</legend>
            <div class="grid">
                <div>
                    <label for="employee_id">Employee ID</label>
                    <input type="text" id="employee_id" name="employee_id" maxlength="{id_max}" value="{employee_id}">
                    <label for="name">Employee Name</label>
                    <input type="text" id="name" name="name" maxlength="{name_max}" value="{name}">
                    <label for="age">Age</label>
                    <input type="number" id="age" name="age" min="{age_min}" max="{age_max}" step="1" required value="{age}">
                    <label for="gender">Gender</label>
                    <select id="gender" name="gender">{gender}</select>
                    <label for="department">Department</label>
                    <select id="department" name="department">{department}</select>
                </div>
                <div>
                    <label for="job_title">Job Title</label>
                    <input type="text" id="job_title" name="job_title" maxlength="{title_max}" value="{job_title}">
                    <label for="experience_years">Experience (Years)</label>
                    <input type="number" id="experience_years" name="experience_years" min="{exp_min}" max="{exp_max}" step="1" required value="{experience_years}">
                    <label for="education_level">Education Level</label>
                    <select id="education_level" name="education_level">{education_level}</select>
                    <label for="location">Location</label>
                    <select id="location" name="location">{location}</select>
                </div>
            </div>
            <button type="submit">Predict Salary</button>
        </fieldset>
    </form>"#,
        id_max = EMPLOYEE_ID_MAX,
        name_max = NAME_MAX,
        title_max = JOB_TITLE_MAX,
        age_min = AGE_RANGE.0,
        age_max = AGE_RANGE.1,
        exp_min = EXPERIENCE_RANGE.0,
        exp_max = EXPERIENCE_RANGE.1,
        employee_id = html_escape(&form.employee_id),
        name = html_escape(&form.name),
        age = html_escape(&form.age),
        job_title = html_escape(&form.job_title),
        experience_years = html_escape(&form.experience_years),
        gender = options(Gender::ALL.iter().map(|v| v.as_str()), &form.gender),
        department = options(Department::ALL.iter().map(|v| v.as_str()), &form.department),
        education_level = options(
            EducationLevel::ALL.iter().map(|v| v.as_str()),
            &form.education_level
        ),
        location = options(Location::ALL.iter().map(|v| v.as_str()), &form.location),
    )
}

fn options<'a>(labels: impl Iterator<Item = &'a str>, selected: &str) -> String {
    labels
        .map(|label| {
            format!(
                r#"<option value="{v}"{sel}>{v}</option>"#,
                v = html_escape(label),
                sel = if label == selected { " selected" } else { "" }
            )
        })
        .collect()
}

fn batch_form() -> String {
    format!(
        r#"    <form method="post" action="/batch" enctype="multipart/form-data">
        <fieldset>
            <legend>Batch Salary Prediction</legend>
            <p>Upload a CSV file with a header row containing the columns Employee_ID, Name, Age, Gender,
            Department, Job_Title, Experience_Years, Education_Level and Location.</p>
            <input type="file" name="file" accept=".csv,text/csv" required>
            <button type="submit">Predict Batch</button>
            <button type="submit" formaction="/batch/download">Predict and Download {file}</button>
        </fieldset>
    </form>"#,
        file = DOWNLOAD_FILE_NAME
    )
}

/// The record as it is handed to the model.
pub fn input_preview(table: &Table) -> String {
    format!(
        "    <details open>\n        <summary>Preview Input Data</summary>\n{}\n    </details>",
        table_html(table)
    )
}

pub fn prediction_result(prediction: &Prediction) -> String {
    format!(
        r#"    <div class="prediction-result">
        <h2>Prediction Result</h2>
        <p class="employee">Employee Name: {name}</p>
        <p class="employee">Employee ID: {id}</p>
        <hr>
        <p class="salary">Predicted Salary: {salary}</p>
    </div>"#,
        name = html_escape(prediction.record.display_name()),
        id = html_escape(prediction.record.display_id()),
        salary = prediction.display_salary(),
    )
}

/// A failure rendered in place of a result, e.g. "Prediction failed: ...".
pub fn error_block(context: &str, err: &dyn Display) -> String {
    format!(
        r#"    <div class="error" role="alert">{}: {}</div>"#,
        html_escape(context),
        html_escape(&err.to_string())
    )
}

pub fn batch_result(outcome: &BatchOutcome, preview_rows: usize, csv: &[u8]) -> String {
    format!(
        r#"    <section class="batch-result">
        <h3>Uploaded Data Preview</h3>
{uploaded}
        <h3>Prediction Results</h3>
        <p>{rows} rows predicted.</p>
{predicted}
{download}
    </section>"#,
        uploaded = table_html(&outcome.uploaded_preview),
        rows = outcome.table.len(),
        predicted = table_html(&outcome.table.head(preview_rows)),
        download = download_link(csv),
    )
}

fn download_link(csv: &[u8]) -> String {
    if csv.len() > INLINE_DOWNLOAD_MAX {
        return format!(
            r#"        <p class="download-note">The results are too large to link here. Upload the file again with "Predict and Download {DOWNLOAD_FILE_NAME}" to save them.</p>"#
        );
    }
    format!(
        r#"        <a class="download" download="{DOWNLOAD_FILE_NAME}" href="data:text/csv;charset=utf-8;base64,{}">Download Predictions as CSV</a>"#,
        Base64::encode_string(csv)
    )
}

pub fn table_html(table: &Table) -> String {
    let mut out = String::from("        <table>\n            <thead><tr>");
    for h in table.headers() {
        out.push_str("<th>");
        out.push_str(&html_escape(h));
        out.push_str("</th>");
    }
    out.push_str("</tr></thead>\n            <tbody>\n");
    for row in table.rows() {
        out.push_str("                <tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&html_escape(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("            </tbody>\n        </table>");
    out
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Builder for urlencoded employee form submissions, starting from the
/// worked example: a 30 year old male engineer in Seattle.
pub struct FormBuilder {
    fields: Vec<(&'static str, String)>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            fields: vec![
                ("employee_id", String::new()),
                ("name", String::new()),
                ("age", "30".to_string()),
                ("gender", "Male".to_string()),
                ("department", "Engineering".to_string()),
                ("job_title", "Software Engineer".to_string()),
                ("experience_years", "5".to_string()),
                ("education_level", "Bachelor".to_string()),
                ("location", "Seattle".to_string()),
            ],
        }
    }

    pub fn with(mut self, field: &'static str, value: &str) -> Self {
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((field, value.to_string())),
        }
        self
    }

    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(&self.fields).expect("Failed to encode form")
    }
}

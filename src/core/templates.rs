//! Localized message bodies for membership-application events.
//!
//! HTML goes through a registry that escapes interpolated values; SMS and
//! WhatsApp text goes through a second registry with escaping turned off.

use crate::domain::model::Applicant;
use crate::utils::error::Result;
use handlebars::Handlebars;
use serde_json::json;

pub const NOT_AVAILABLE: &str = "غير متوفر";

const NEW_APPLICATION_HTML: &str = r#"
<div dir="rtl" style="text-align: right; font-family: Arial, sans-serif;">
  <h2>تم تقديم طلب عضوية جديد</h2>
  <p>هناك طلب عضوية جديد بحاجة إلى مراجعتك من:</p>
  <ul>
    <li>الاسم: {{name}}</li>
    <li>البريد الإلكتروني: {{email}}</li>
    <li>رقم الهاتف: {{phone}}</li>
    <li>رقم الواتساب: {{whatsapp}}</li>
  </ul>
  <p>يرجى مراجعة الطلب في لوحة التحكم.</p>
</div>
"#;

const APPROVED_HTML: &str = r#"
<div dir="rtl" style="text-align: right; font-family: Arial, sans-serif;">
  <h2>تمت الموافقة على طلب العضوية الخاص بك</h2>
  <p>مرحباً {{name}}،</p>
  <p>يسعدنا إخبارك بأنه تمت الموافقة على طلب العضوية الخاص بك!</p>
  {{#if notes}}<p>ملاحظات المراجع: {{notes}}</p>{{/if}}
  <p>يمكنك الآن تسجيل الدخول واستخدام جميع ميزات المنصة.</p>
  <p>شكراً لانضمامك إلينا!</p>
</div>
"#;

const REJECTED_HTML: &str = r#"
<div dir="rtl" style="text-align: right; font-family: Arial, sans-serif;">
  <h2>تم رفض طلب العضوية الخاص بك</h2>
  <p>مرحباً {{name}}،</p>
  <p>نأسف لإخبارك بأنه تم رفض طلب العضوية الخاص بك.</p>
  {{#if notes}}<p>سبب الرفض: {{notes}}</p>{{/if}}
  <p>إذا كان لديك أي أسئلة أو ترغب في معرفة المزيد من المعلومات، يرجى التواصل مع فريق الدعم.</p>
</div>
"#;

const NEW_APPLICATION_SUBJECT: &str = "طلب عضوية جديد: {{name}}";
const APPROVED_SUBJECT: &str = "تهانينا! تمت الموافقة على طلب العضوية الخاص بك";
const REJECTED_SUBJECT: &str = "تم رفض طلب العضوية الخاص بك";

const NEW_APPLICATION_TEXT: &str =
    "طلب عضوية جديد: {{name}}. يرجى مراجعة الطلب في لوحة التحكم.";
const APPROVED_TEXT: &str = "مرحباً {{name}}، تمت الموافقة على طلب العضوية الخاص بك! يمكنك الآن تسجيل الدخول واستخدام جميع ميزات المنصة.";
const REJECTED_TEXT: &str = "مرحباً {{name}}، نأسف لإخبارك بأنه تم رفض طلب العضوية الخاص بك. {{#if notes}}سبب الرفض: {{notes}} {{/if}}يرجى التواصل مع الدعم لمزيد من المعلومات.";

/// Subject plus HTML body of one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

pub struct MessageTemplates {
    html: Handlebars<'static>,
    text: Handlebars<'static>,
}

impl MessageTemplates {
    pub fn new() -> Result<Self> {
        let mut html = Handlebars::new();
        html.register_template_string("new_application", NEW_APPLICATION_HTML)?;
        html.register_template_string("approved", APPROVED_HTML)?;
        html.register_template_string("rejected", REJECTED_HTML)?;

        let mut text = Handlebars::new();
        text.register_escape_fn(handlebars::no_escape);
        text.register_template_string("new_application_subject", NEW_APPLICATION_SUBJECT)?;
        text.register_template_string("new_application", NEW_APPLICATION_TEXT)?;
        text.register_template_string("approved", APPROVED_TEXT)?;
        text.register_template_string("rejected", REJECTED_TEXT)?;

        Ok(Self { html, text })
    }

    pub fn new_application_email(&self, applicant: &Applicant) -> Result<RenderedEmail> {
        let data = json!({
            "name": applicant.name,
            "email": applicant.email_address().unwrap_or(NOT_AVAILABLE),
            "phone": applicant.phone_number().unwrap_or(NOT_AVAILABLE),
            "whatsapp": applicant.whatsapp_number().unwrap_or(NOT_AVAILABLE),
        });

        Ok(RenderedEmail {
            subject: self.text.render("new_application_subject", &data)?,
            html: self.html.render("new_application", &data)?,
        })
    }

    pub fn approved_email(&self, applicant: &Applicant, notes: Option<&str>) -> Result<RenderedEmail> {
        Ok(RenderedEmail {
            subject: APPROVED_SUBJECT.to_string(),
            html: self.html.render("approved", &review_data(applicant, notes))?,
        })
    }

    pub fn rejected_email(&self, applicant: &Applicant, notes: Option<&str>) -> Result<RenderedEmail> {
        Ok(RenderedEmail {
            subject: REJECTED_SUBJECT.to_string(),
            html: self.html.render("rejected", &review_data(applicant, notes))?,
        })
    }

    pub fn new_application_text(&self, applicant: &Applicant) -> Result<String> {
        Ok(self
            .text
            .render("new_application", &json!({ "name": applicant.name }))?)
    }

    pub fn approved_text(&self, applicant: &Applicant) -> Result<String> {
        Ok(self
            .text
            .render("approved", &json!({ "name": applicant.name }))?)
    }

    pub fn rejected_text(&self, applicant: &Applicant, notes: Option<&str>) -> Result<String> {
        Ok(self.text.render("rejected", &review_data(applicant, notes))?)
    }
}

fn review_data(applicant: &Applicant, notes: Option<&str>) -> serde_json::Value {
    json!({
        "name": applicant.name,
        "notes": crate::domain::model::non_blank(notes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> MessageTemplates {
        MessageTemplates::new().unwrap()
    }

    #[test]
    fn test_new_application_lists_missing_fields_as_unavailable() {
        let applicant = Applicant::new("أحمد علي").with_email("ahmed@example.com");
        let email = templates().new_application_email(&applicant).unwrap();

        assert_eq!(email.subject, "طلب عضوية جديد: أحمد علي");
        assert!(email.html.contains("الاسم: أحمد علي"));
        assert!(email.html.contains("البريد الإلكتروني: ahmed@example.com"));
        assert!(email.html.contains(&format!("رقم الهاتف: {}", NOT_AVAILABLE)));
        assert!(email.html.contains(&format!("رقم الواتساب: {}", NOT_AVAILABLE)));
        assert!(email.html.contains(r#"dir="rtl""#));
    }

    #[test]
    fn test_notes_paragraph_only_when_present() {
        let applicant = Applicant::new("Mona");

        let with_notes = templates()
            .approved_email(&applicant, Some("مرحباً بك"))
            .unwrap();
        assert!(with_notes.html.contains("ملاحظات المراجع: مرحباً بك"));

        let without_notes = templates().approved_email(&applicant, None).unwrap();
        assert!(!without_notes.html.contains("ملاحظات المراجع"));

        let blank_notes = templates().rejected_email(&applicant, Some("  ")).unwrap();
        assert!(!blank_notes.html.contains("سبب الرفض"));
    }

    #[test]
    fn test_html_values_are_escaped() {
        let applicant = Applicant::new("<script>alert(1)</script>");
        let email = templates().new_application_email(&applicant).unwrap();

        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        // 主旨是純文字，不做 HTML 轉義
        assert!(email.subject.contains("<script>"));
    }

    #[test]
    fn test_rejected_text_carries_reason() {
        let applicant = Applicant::new("Omar");
        let text = templates()
            .rejected_text(&applicant, Some("البيانات غير مكتملة"))
            .unwrap();

        assert!(text.starts_with("مرحباً Omar،"));
        assert!(text.contains("سبب الرفض: البيانات غير مكتملة"));

        let text = templates().rejected_text(&applicant, None).unwrap();
        assert!(!text.contains("سبب الرفض"));
    }

    #[test]
    fn test_sms_text_is_not_html_escaped() {
        let applicant = Applicant::new("Tom & Jerry");
        let text = templates().approved_text(&applicant).unwrap();
        assert!(text.contains("Tom & Jerry"));
    }
}

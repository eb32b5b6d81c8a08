use bmc_coach::*;
use chrono::NaiveDate;
use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use std::future::Future;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Returns a canned response and records every request it receives.
#[derive(Clone, Default)]
struct StubModel {
    response: String,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl StubModel {
    fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            requests: Arc::default(),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_user_message(&self) -> String {
        let requests = self.requests.lock().unwrap();
        let messages = requests.last().expect("no request recorded");
        messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

impl CoachingModel for StubModel {
    fn complete(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<String>> + Send {
        self.requests.lock().unwrap().push(messages.to_vec());
        let response = self.response.clone();
        async move { Ok(response) }
    }
}

struct FailingModel;

impl CoachingModel for FailingModel {
    fn complete(&self, _messages: &[ChatMessage]) -> impl Future<Output = Result<String>> + Send {
        async { Err(CoachError::LlmRequest("No response within 60 seconds".to_string())) }
    }
}

fn cell(text: &str) -> TableCell {
    let mut cell = TableCell::new();
    for line in text.split('\n') {
        cell = cell.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }
    cell
}

fn pack(docx: Docx) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

fn table_docx(rows: &[(&str, &str)]) -> Vec<u8> {
    let table = Table::new(
        rows.iter()
            .map(|(label, value)| TableRow::new(vec![cell(label), cell(value)]))
            .collect(),
    );
    pack(
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Business Model Canvas")))
            .add_table(table),
    )
}

fn heading_docx(paragraphs: &[&str]) -> Vec<u8> {
    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });
    pack(docx)
}

fn full_canvas_rows() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Business Name", "Bean There Coffee"),
        ("Brief Description", "Specialty coffee carts at commuter rail stations"),
        ("1) Problem", "What problem are you solving?\nCommuters have no time for good coffee"),
        ("2) Value Proposition", "Barista-quality coffee in under a minute"),
        ("3) Unfair Advantage", "Exclusive station vending permits"),
        ("4) Customer Segments", "Which customer groups are you targeting?"),
        ("5) Channels", "Carts on platforms, preorder app"),
        ("6) Customer Relationships", "Loyalty card"),
        ("7) Key Activities", "Roasting, cart operations"),
        ("8) Key Resources", "Carts, permits, baristas"),
        ("9) Key Partners", "Transit authority, local roaster"),
        ("10) Revenue Streams", "Per-cup sales, subscriptions"),
        ("11) Cost Structure", "Beans, wages, permit fees"),
        ("12) Kingdom Impact", "Hire and train people re-entering the workforce"),
    ]
}

fn model_response() -> String {
    let mut response = String::from("```markdown\n# Coaching Feedback\n\n");
    for title in SECTION_TITLES {
        response.push_str(&format!("**{title}**\n"));
        for subheading in taxonomy::subheadings_for(title) {
            response.push_str(&format!("{subheading}:\n- Model says something about {title}\n"));
        }
        response.push('\n');
    }
    response.push_str(&format!("{ADVISORY_FOOTER}\n{ADVISORY_FOOTER}\n```"));
    response
}

#[test]
fn test_table_document_round_trip() {
    let bytes = table_docx(&full_canvas_rows());
    let submission = read_submission("canvas.docx", &bytes).unwrap();

    let Submission::Structured(payload) = submission else {
        panic!("expected a structured submission");
    };
    assert_eq!(payload.get(CanvasField::BusinessName), "Bean There Coffee");
    assert_eq!(
        payload.get(CanvasField::Problem),
        "Commuters have no time for good coffee"
    );
    assert_eq!(payload.get(CanvasField::CustomerSegments), "");

    let blocks = empty_blocks(&payload);
    assert_eq!(blocks.titles(), &["4) Customer Segments"]);
}

#[test]
fn test_heading_document_round_trip() {
    let bytes = heading_docx(&[
        "My canvas draft",
        "Business Name",
        "Bean There Coffee",
        "1) Problem",
        "What problem are you solving?",
        "Commuters have no time for good coffee",
        "Mornings are rushed",
        "5) Channels: carts on platforms",
        "Revenue Streams",
        "How will you make money?",
    ]);
    let Submission::Structured(payload) = read_submission("canvas.docx", &bytes).unwrap() else {
        panic!("expected a structured submission");
    };

    assert_eq!(
        payload.get(CanvasField::Problem),
        "Commuters have no time for good coffee\nMornings are rushed"
    );
    assert_eq!(payload.get(CanvasField::Channels), "carts on platforms");
    assert_eq!(payload.get(CanvasField::RevenueStreams), "");
    assert_eq!(empty_blocks(&payload).len(), 10);
}

#[test]
fn test_plain_text_upload() {
    let text = "Business Name: Bean There\r\nProblem\r\nLong queues at stations\r\n";
    let Submission::Structured(payload) = read_submission("canvas.txt", text.as_bytes()).unwrap()
    else {
        panic!("expected a structured submission");
    };
    assert_eq!(payload.get(CanvasField::BusinessName), "Bean There");
    assert_eq!(payload.get(CanvasField::Problem), "Long queues at stations");
}

#[test]
fn test_unsupported_upload_is_rejected() {
    let err = read_submission("logo.gif", &[0x47, 0x49, 0x46, 0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, CoachError::UnsupportedFormat(ext) if ext == "gif"));
}

#[test]
fn test_corrupt_docx_is_a_read_error() {
    let err = read_submission("canvas.docx", b"PK\x03\x04 not really a zip").unwrap_err();
    assert!(matches!(err, CoachError::DocumentRead { .. }));
}

#[tokio::test]
async fn test_end_to_end_enforces_empty_block() {
    let model = StubModel::new(model_response());
    let coach = BmcCoach::new(model.clone());
    let bytes = table_docx(&full_canvas_rows());

    let (tx, mut rx) = mpsc::channel(16);
    let report = coach.coach_upload("canvas.docx", &bytes, Some(tx)).await.unwrap();

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            CoachingEvent::Starting,
            CoachingEvent::RequestingFeedback { empty_blocks: 1 },
            CoachingEvent::NormalizingResponse,
            CoachingEvent::EnforcingMissingBlocks,
            CoachingEvent::Success,
        ]
    );

    let user_message = model.last_user_message();
    assert!(user_message.starts_with("FOUNDER_PAYLOAD v1\n"));
    assert!(user_message.contains("EMPTY_BLOCKS v1\n[\"4) Customer Segments\"]"));

    let markdown = &report.markdown;
    assert!(markdown.starts_with("# Coaching Feedback\n\n## 1) Problem\n### Strengths\n"));
    assert!(markdown.contains(
        "## 4) Customer Segments\n### Strengths\n- Missing/Needs input.\n### Weaknesses\n- Missing/Needs input.\n### Probing Questions\n- Missing/Needs input.\n### Suggested Explorations\n- Missing/Needs input.\n"
    ));
    assert!(!markdown.contains("Model says something about 4) Customer Segments"));
    assert!(markdown.contains("- Model says something about 5) Channels"));
    assert!(markdown.contains("## 14) Final Assessment\n### Overall Strengths\n"));
    assert!(!markdown.contains(ADVISORY_FOOTER));
    assert_eq!(report.metadata.business_name, "Bean There Coffee");
}

#[tokio::test]
async fn test_every_empty_block_is_placeholder_only() {
    let mut payload = FounderPayload::new();
    payload.set(CanvasField::BusinessName, "Solo Founder");
    payload.set(CanvasField::ValueProposition, "Cheaper bike repairs");

    let coach = BmcCoach::new(StubModel::new(model_response()));
    let report = coach
        .coach(Submission::Structured(payload), None)
        .await
        .unwrap();

    assert_eq!(report.empty_blocks.len(), 11);
    for title in report.empty_blocks.titles() {
        assert!(!report
            .markdown
            .contains(&format!("Model says something about {title}\n")));
    }
    assert!(report
        .markdown
        .contains("- Model says something about 2) Value Proposition"));
    assert!(report
        .markdown
        .contains("- Model says something about 13) Cross-Block Observations"));
}

#[tokio::test]
async fn test_report_renders_with_single_footer() {
    let coach = BmcCoach::new(StubModel::new(model_response()));
    let options = ReportOptions::default()
        .with_coach_name("Grace Hopper")
        .with_generated_on(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());

    let rendered = coach
        .coach_and_render(
            read_submission("canvas.docx", &table_docx(&full_canvas_rows())).unwrap(),
            &options,
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        rendered.file_name,
        "Grace_Hopper_Feedback_Bean_There_Coffee.docx"
    );
    let document = ParsedDocument::from_docx_bytes(&rendered.bytes).unwrap();
    let paragraphs: Vec<&str> = document.paragraphs().collect();
    assert_eq!(
        paragraphs.iter().filter(|p| **p == ADVISORY_FOOTER).count(),
        1
    );
    assert!(paragraphs.contains(&"4) Customer Segments"));
    assert!(paragraphs.contains(&MISSING_MARKER));
}

#[tokio::test]
async fn test_model_failure_is_reported() {
    let coach = BmcCoach::new(FailingModel);
    let (tx, mut rx) = mpsc::channel(16);

    let err = coach
        .coach_upload("canvas.docx", &table_docx(&full_canvas_rows()), Some(tx))
        .await
        .unwrap_err();
    assert!(matches!(err, CoachError::LlmRequest(_)));
    assert!(err.to_string().starts_with("Coaching request failed:"));

    let mut last = None;
    while let Some(event) = rx.recv().await {
        last = Some(event);
    }
    assert!(matches!(last, Some(CoachingEvent::Failed { .. })));
}

#[tokio::test]
async fn test_document_without_content_never_reaches_model() {
    let model = StubModel::new(model_response());
    let coach = BmcCoach::new(model.clone());
    let bytes = heading_docx(&["Some unrelated memo", "Nothing about a canvas here"]);

    let err = coach.coach_upload("memo.docx", &bytes, None).await.unwrap_err();
    assert!(matches!(err, CoachError::NoContentDetected));
    assert!(err.to_string().contains("1) Problem"));
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_web_form_submission() {
    let form: FormSubmission = serde_json::from_value(serde_json::json!({
        "business_name": "Bean There",
        "problem": "What problem are you solving?\nLong queues",
        "channels": "Carts"
    }))
    .unwrap();

    let model = StubModel::new(model_response());
    let report = BmcCoach::new(model.clone())
        .coach_form(form, None)
        .await
        .unwrap();

    assert_eq!(report.empty_blocks.len(), 10);
    assert!(!report.empty_blocks.contains("1) Problem"));
    assert!(model.last_user_message().contains("\"problem\": \"Long queues\""));
}

#[test]
fn test_form_schema_lists_every_field() {
    let schema = form_schema();
    let properties = schema["properties"].as_object().unwrap();
    for field in CanvasField::ALL {
        assert!(properties.contains_key(field.key()), "{}", field.key());
    }
}

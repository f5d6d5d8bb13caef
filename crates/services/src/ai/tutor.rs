use std::env;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use mastery_core::model::{ErrorItem, Feedback, HintItem};

use crate::ai::provider::{GeminiProvider, GenerationProvider, GenerationRequest};
use crate::ai::schema::ResponseSchema;
use crate::error::{GenerationError, ParseError};
use crate::retry::RetryPolicy;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// AI tutor client: composes prompts, constrains the response shape, and
/// parses the structured replies into domain types.
///
/// Every round trip (request plus parse) runs through the retry policy;
/// the last failure surfaces unchanged once the budget is spent.
#[derive(Clone)]
pub struct TutorService {
    provider: Arc<dyn GenerationProvider>,
    retry: RetryPolicy,
    model: String,
}

impl TutorService {
    #[must_use]
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::new(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Build a tutor backed by the Gemini provider, honoring
    /// `MASTERY_AI_MODEL` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut tutor = Self::new(Arc::new(GeminiProvider::from_env()));
        if let Ok(model) = env::var("MASTERY_AI_MODEL") {
            if !model.trim().is_empty() {
                tutor.model = model;
            }
        }
        tutor
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Compose a fresh Vietnamese practice paragraph (~8-12 sentences,
    /// intermediate level) about `topic`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for a blank topic, otherwise
    /// the final request/parse failure once retries are exhausted.
    pub async fn generate_paragraph(&self, topic: &str) -> Result<String, GenerationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        debug!("generating practice paragraph for topic \"{topic}\"");

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: paragraph_prompt(topic),
            schema: ResponseSchema::object([("paragraph", ResponseSchema::string())])
                .required(["paragraph"]),
        };
        let request = &request;

        self.retry
            .run(|| async move {
                let text = self.provider.generate(request).await?;
                let payload: ParagraphPayload = parse_json(&text)?;
                Ok(payload.paragraph)
            })
            .await
    }

    /// Grade `translation` against the Vietnamese `source` sentence.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` when either input is blank,
    /// otherwise the final request/parse failure once retries are
    /// exhausted. A reply missing a required field or carrying a score
    /// outside `0..=100` is a parse failure; a missing `errors` field is
    /// an empty error list.
    pub async fn feedback_for_sentence(
        &self,
        source: &str,
        translation: &str,
    ) -> Result<Feedback, GenerationError> {
        if source.trim().is_empty() || translation.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        debug!("requesting feedback for sentence \"{source}\"");

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: feedback_prompt(source, translation),
            schema: feedback_schema(),
        };
        let request = &request;

        self.retry
            .run(|| async move {
                let text = self.provider.generate(request).await?;
                let payload: FeedbackPayload = parse_json(&text)?;
                let feedback = payload.into_feedback().map_err(ParseError::from)?;
                Ok(feedback)
            })
            .await
    }

    /// Suggest 3-5 key vocabulary items for the Vietnamese `source`
    /// sentence.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for a blank sentence,
    /// otherwise the final request/parse failure once retries are
    /// exhausted. An empty hint array is a parse failure.
    pub async fn hints_for_sentence(&self, source: &str) -> Result<Vec<HintItem>, GenerationError> {
        if source.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        debug!("requesting vocabulary hints for sentence \"{source}\"");

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: hint_prompt(source),
            schema: hint_schema(),
        };
        let request = &request;

        self.retry
            .run(|| async move {
                let text = self.provider.generate(request).await?;
                let payload: Vec<HintPayload> = parse_json(&text)?;
                if payload.is_empty() {
                    return Err(GenerationError::Parse(ParseError::EmptyHints));
                }
                Ok(payload.into_iter().map(HintPayload::into_hint).collect())
            })
            .await
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    Ok(serde_json::from_str(text)?)
}

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

fn paragraph_prompt(topic: &str) -> String {
    format!(
        "Dựa trên chủ đề \"{topic}\", hãy viết một đoạn văn tiếng Việt hoàn toàn mới, \
         dài khoảng 8-12 câu, ở trình độ B1-B2. Đoạn văn phải tự nhiên và phù hợp cho \
         người học tiếng Anh. Trả về một đối tượng JSON với khóa \"paragraph\" chứa \
         toàn bộ đoạn văn dưới dạng một chuỗi duy nhất."
    )
}

fn feedback_prompt(source: &str, translation: &str) -> String {
    format!(
        "Bạn là một gia sư AI chuyên nghiệp, tập trung vào tốc độ phản hồi và chấm điểm \
         sửa lỗi trọng tâm. Cho câu tiếng Việt gốc: \"{source}\" và bản dịch của học \
         viên: \"{translation}\". Hãy thực hiện các công việc sau và trả về một đối \
         tượng JSON:\n\
         1. Cung cấp một bản dịch tiếng Anh \"chuẩn\" (correct_translation) - phải là \
         một câu tự nhiên, hay nhất.\n\
         2. So sánh bản dịch của học viên với bản dịch chuẩn và đưa ra điểm chính xác \
         từ 0 đến 100 (accuracy_score).\n\
         3. Liệt kê các lỗi cụ thể trong một mảng \"errors\". Các lỗi này phải là trọng \
         tâm và quan trọng nhất (ví dụ: lỗi Ngữ pháp, lỗi Chọn từ, lỗi Cấu trúc câu). \
         Mỗi lỗi là một đối tượng có \"type\" (ví dụ: 'Ngữ pháp', 'Từ vựng') và \
         \"explanation\" (giải thích lỗi bằng tiếng Việt, trong đó các từ hoặc cụm từ \
         quan trọng được đặt trong dấu nháy đơn, ví dụ: 'word'). Tối đa 3 lỗi.\n\
         4. Đưa ra một nhận xét chung, động viên bằng tiếng Việt (general_feedback, sử \
         dụng dấu nháy đơn cho các từ/cụm từ quan trọng)."
    )
}

fn hint_prompt(source: &str) -> String {
    format!(
        "Cho câu tiếng Việt sau: \"{source}\". Hãy liệt kê 3-5 từ vựng tiếng Anh quan \
         trọng nhất có trong câu này mà người học có thể cần biết để dịch. Với mỗi từ, \
         cung cấp nghĩa tiếng Việt của nó. Trả về một mảng JSON các đối tượng có khóa \
         \"english_word\" và \"vietnamese_meaning\"."
    )
}

//
// ─── SCHEMAS & PAYLOADS ────────────────────────────────────────────────────────
//

fn feedback_schema() -> ResponseSchema {
    ResponseSchema::object([
        ("correct_translation", ResponseSchema::string()),
        ("accuracy_score", ResponseSchema::integer()),
        (
            "errors",
            ResponseSchema::array(
                ResponseSchema::object([
                    ("type", ResponseSchema::string()),
                    ("explanation", ResponseSchema::string()),
                ])
                .required(["type", "explanation"]),
            ),
        ),
        ("general_feedback", ResponseSchema::string()),
    ])
    .required(["correct_translation", "accuracy_score", "general_feedback"])
}

fn hint_schema() -> ResponseSchema {
    ResponseSchema::array(
        ResponseSchema::object([
            ("english_word", ResponseSchema::string()),
            ("vietnamese_meaning", ResponseSchema::string()),
        ])
        .required(["english_word", "vietnamese_meaning"]),
    )
}

#[derive(Debug, Deserialize)]
struct ParagraphPayload {
    paragraph: String,
}

#[derive(Debug, Deserialize)]
struct FeedbackPayload {
    correct_translation: String,
    accuracy_score: u16,
    #[serde(default)]
    errors: Vec<ErrorPayload>,
    general_feedback: String,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(rename = "type")]
    category: String,
    explanation: String,
}

impl FeedbackPayload {
    fn into_feedback(self) -> Result<Feedback, mastery_core::model::FeedbackError> {
        Feedback::new(
            self.correct_translation,
            self.accuracy_score,
            self.errors
                .into_iter()
                .map(|item| ErrorItem::new(item.category, item.explanation))
                .collect(),
            self.general_feedback,
        )
    }
}

#[derive(Debug, Deserialize)]
struct HintPayload {
    english_word: String,
    vietnamese_meaning: String,
}

impl HintPayload {
    fn into_hint(self) -> HintItem {
        HintItem::new(self.english_word, self.vietnamese_meaning)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::ai::provider::InMemoryProvider;

    fn tutor_with(provider: &Arc<InMemoryProvider>) -> TutorService {
        TutorService::new(Arc::clone(provider) as Arc<dyn GenerationProvider>)
            .with_retry(RetryPolicy::new().with_initial_delay(Duration::ZERO))
    }

    #[tokio::test]
    async fn generates_paragraph_from_structured_reply() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text(r#"{"paragraph":"Mùa hè rất nóng. Tôi thích đi biển."}"#);
        let tutor = tutor_with(&provider);

        let paragraph = tutor.generate_paragraph("kỳ nghỉ hè").await.unwrap();
        assert_eq!(paragraph, "Mùa hè rất nóng. Tôi thích đi biển.");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn blank_topic_fails_without_a_request() {
        let provider = Arc::new(InMemoryProvider::new());
        let tutor = tutor_with(&provider);

        let err = tutor.generate_paragraph("   ").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyInput));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn missing_errors_field_parses_as_empty_list() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text(
            r#"{"correct_translation":"X","accuracy_score":87,"general_feedback":"Y"}"#,
        );
        let tutor = tutor_with(&provider);

        let feedback = tutor.feedback_for_sentence("Tôi đi học.", "I go to school.").await.unwrap();
        assert_eq!(feedback.correct_translation(), "X");
        assert_eq!(feedback.accuracy_score(), 87);
        assert_eq!(feedback.general_feedback(), "Y");
        assert!(feedback.errors().is_empty());
    }

    #[tokio::test]
    async fn feedback_errors_keep_their_wire_order() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text(
            r#"{"correct_translation":"I went home.","accuracy_score":60,
                "errors":[{"type":"Ngữ pháp","explanation":"thiếu thì quá khứ"},
                          {"type":"Từ vựng","explanation":"chọn từ chưa đúng"}],
                "general_feedback":"Tiếp tục cố gắng!"}"#,
        );
        let tutor = tutor_with(&provider);

        let feedback = tutor.feedback_for_sentence("Tôi về nhà.", "I go home.").await.unwrap();
        assert_eq!(feedback.errors().len(), 2);
        assert_eq!(feedback.errors()[0].category, "Ngữ pháp");
        assert_eq!(feedback.errors()[1].category, "Từ vựng");
    }

    #[tokio::test]
    async fn missing_required_field_is_a_parse_failure() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text(r#"{"correct_translation":"X","accuracy_score":87}"#);
        let tutor = TutorService::new(Arc::clone(&provider) as Arc<dyn GenerationProvider>)
            .with_retry(RetryPolicy::new().with_max_retries(0));

        let err = tutor.feedback_for_sentence("Một.", "One.").await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn out_of_range_score_is_a_parse_failure() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text(
            r#"{"correct_translation":"X","accuracy_score":250,"general_feedback":"Y"}"#,
        );
        let tutor = TutorService::new(Arc::clone(&provider) as Arc<dyn GenerationProvider>)
            .with_retry(RetryPolicy::new().with_max_retries(0));

        let err = tutor.feedback_for_sentence("Một.", "One.").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Parse(ParseError::Feedback(_))
        ));
    }

    #[tokio::test]
    async fn hints_parse_into_word_meaning_pairs() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text(
            r#"[{"english_word":"beach","vietnamese_meaning":"bãi biển"},
                {"english_word":"vacation","vietnamese_meaning":"kỳ nghỉ"},
                {"english_word":"summer","vietnamese_meaning":"mùa hè"}]"#,
        );
        let tutor = tutor_with(&provider);

        let hints = tutor.hints_for_sentence("Kỳ nghỉ hè ở bãi biển.").await.unwrap();
        assert_eq!(hints.len(), 3);
        assert_eq!(hints[0], HintItem::new("beach", "bãi biển"));
    }

    #[tokio::test]
    async fn empty_hint_array_is_a_parse_failure() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text("[]");
        let tutor = TutorService::new(Arc::clone(&provider) as Arc<dyn GenerationProvider>)
            .with_retry(RetryPolicy::new().with_max_retries(0));

        let err = tutor.hints_for_sentence("Một câu.").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Parse(ParseError::EmptyHints)
        ));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_failure();
        provider.push_failure();
        provider.push_text(r#"{"paragraph":"Một câu duy nhất."}"#);
        let tutor = tutor_with(&provider);

        let paragraph = tutor.generate_paragraph("gia đình").await.unwrap();
        assert_eq!(paragraph, "Một câu duy nhất.");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_last_error() {
        let provider = Arc::new(InMemoryProvider::new());
        provider.push_text("not json");
        provider.push_text("still not json");
        let tutor = TutorService::new(Arc::clone(&provider) as Arc<dyn GenerationProvider>)
            .with_retry(
                RetryPolicy::new()
                    .with_max_retries(1)
                    .with_initial_delay(Duration::ZERO),
            );

        let err = tutor.generate_paragraph("du lịch").await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(ParseError::Json(_))));
        assert_eq!(provider.calls(), 2);
    }
}

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// 國學大師人設的固定指令，要求模型直接回傳 JSON。
pub const ANALYSIS_INSTRUCTION: &str = r#"你是一位精通面相学、审美高雅且富有文采的国学大师。请分析这张照片中的人物。

请严格按照以下要求生成 JSON 格式的回复：
1. **打分 (appearanceScore)**：对颜值进行打分。虽然需要真实，但为了照顾用户情绪，请确保分数在 70 到 100 分之间。
2. **评价 (compliment)**：用优美的中文对人物形象进行点评。多用正面肯定的语言，从五官、气质、神态等方面进行具体的表扬。
3. **结语 (poem)**：结合评价和打分，创作一首“七言二句”的古诗（共14字，分两句）作为总结。
4. **运势 (fortuneScore)**：给出今日的运势指数，分数在 70 到 100 分之间。
5. **运势点评 (fortuneAdvice)**：给出一段关于今日运势的解析和建议，语言要充满玄机但积极向上。

请直接返回 JSON 数据。"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaKind {
    Number,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: SchemaKind,
    pub description: String,
}

impl SchemaField {
    pub fn new(name: &str, kind: SchemaKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
        }
    }
}

/// Object schema in the OpenAPI subset accepted by structured-output endpoints.
///
/// Properties serialize in declaration order; `propertyOrdering` repeats that
/// order so the model emits fields the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    pub fields: Vec<SchemaField>,
    pub required: Vec<String>,
}

impl ResponseSchema {
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

impl Serialize for ResponseSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Properties<'a>(&'a [SchemaField]);

        #[derive(Serialize)]
        struct Property<'a> {
            #[serde(rename = "type")]
            kind: SchemaKind,
            description: &'a str,
        }

        impl Serialize for Properties<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for field in self.0 {
                    map.serialize_entry(
                        &field.name,
                        &Property {
                            kind: field.kind,
                            description: &field.description,
                        },
                    )?;
                }
                map.end()
            }
        }

        let ordering: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();

        let mut state = serializer.serialize_struct("ResponseSchema", 4)?;
        state.serialize_field("type", "OBJECT")?;
        state.serialize_field("properties", &Properties(&self.fields))?;
        state.serialize_field("required", &self.required)?;
        state.serialize_field("propertyOrdering", &ordering)?;
        state.end()
    }
}

/// 五個欄位全部必填。
pub fn analysis_schema() -> ResponseSchema {
    let fields = vec![
        SchemaField::new(
            "appearanceScore",
            SchemaKind::Number,
            "A score between 70 and 100 for the person's appearance.",
        ),
        SchemaField::new(
            "compliment",
            SchemaKind::String,
            "A positive, complimentary evaluation of the person's temperament and image in Chinese.",
        ),
        SchemaField::new(
            "poem",
            SchemaKind::String,
            "A summary of the evaluation in the form of a Chinese poem: two lines, seven characters each (七言二句).",
        ),
        SchemaField::new(
            "fortuneScore",
            SchemaKind::Number,
            "A fortune score between 70 and 100 for the current day.",
        ),
        SchemaField::new(
            "fortuneAdvice",
            SchemaKind::String,
            "Fortune prediction and advice for the day in Chinese.",
        ),
    ];
    let required = fields.iter().map(|f| f.name.clone()).collect();

    ResponseSchema { fields, required }
}

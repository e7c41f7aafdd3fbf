//! Prompt templates for contract analysis.
//!
//! Each builder substitutes the contract text (and question or second
//! contract) verbatim. Every JSON template ends with [`JSON_ONLY`]; the
//! general legal question is the only plain-text prompt.

// ── Shared fragments ──

/// Closing instruction for every template that expects JSON back.
pub const JSON_ONLY: &str = "Responde ÚNICAMENTE con el objeto JSON. Sin bloques markdown, sin texto adicional.";

fn contract_block(label: &str, text: &str) -> String {
    format!("{label}:\n```\n{text}\n```")
}

// ── Prompt templates ──

const ANALYSIS_SHAPE: &str = "\
{
  \"type\": \"tipo de contrato (Laboral, Arrendamiento, Servicios, NDA, Compraventa u otro)\",
  \"keyClauses\": [\"cláusulas más relevantes del contrato\"],
  \"risks\": [\"riesgos, cláusulas abusivas o puntos problemáticos\"],
  \"riskScore\": 75.0,
  \"recommendations\": [\"acciones concretas para proteger al usuario\"],
  \"summary\": \"resumen ejecutivo de dos o tres oraciones\"
}";

const ANALYSIS_CRITERIA: &str = "\
Criterios:
- riskScore entre 0 y 100, donde 100 significa sin riesgos y 0 muy riesgoso.
- Señala penalidades excesivas, renuncias a derechos, prórrogas automáticas y responsabilidad sin límite.
- Verifica que existan cláusulas esenciales: terminación, confidencialidad, jurisdicción y limitación de responsabilidad.";

pub fn build_analysis_prompt(contract: &str) -> String {
    format!(
        "Eres un analista legal experto en revisión de contratos. \
         Analiza a fondo el siguiente contrato.\n\
         \n\
         {contract}\n\
         \n\
         Devuelve un objeto JSON con exactamente esta estructura:\n\
         {shape}\n\
         \n\
         {criteria}\n\
         \n\
         {json_only}",
        contract = contract_block("CONTRATO", contract),
        shape = ANALYSIS_SHAPE,
        criteria = ANALYSIS_CRITERIA,
        json_only = JSON_ONLY,
    )
}

pub fn build_question_prompt(contract: &str, question: &str) -> String {
    format!(
        "Eres un asistente legal. Contesta usando solo el contenido de este contrato; \
         si la respuesta no está en el texto, dilo explícitamente.\n\
         \n\
         {contract}\n\
         \n\
         PREGUNTA:\n\
         {question}\n\
         \n\
         Formato de respuesta:\n\
         {{\n  \
           \"answer\": \"respuesta directa y completa\",\n  \
           \"references\": [\"citas textuales del contrato que la sustentan\"],\n  \
           \"confidence\": \"high | medium | low\"\n\
         }}\n\
         \n\
         {json_only}",
        contract = contract_block("CONTRATO", contract),
        json_only = JSON_ONLY,
    )
}

pub fn build_summary_prompt(contract: &str) -> String {
    format!(
        "Redacta un resumen ejecutivo del siguiente contrato: tipo, partes, objeto, \
         vigencia, obligaciones de cada parte, condiciones económicas y de terminación.\n\
         \n\
         {contract}\n\
         \n\
         Formato de respuesta:\n\
         {{\n  \
           \"summary\": \"resumen ejecutivo\",\n  \
           \"keyPoints\": [\"puntos clave\"],\n  \
           \"parties\": [\"parte 1\", \"parte 2\"],\n  \
           \"duration\": \"vigencia o plazo\",\n  \
           \"mainObligations\": {{\"parte1\": [\"obligación\"], \"parte2\": [\"obligación\"]}}\n\
         }}\n\
         \n\
         {json_only}",
        contract = contract_block("CONTRATO", contract),
        json_only = JSON_ONLY,
    )
}

pub fn build_type_detection_prompt(contract: &str) -> String {
    format!(
        "Clasifica el siguiente contrato en una categoría: Laboral, Arrendamiento, \
         Servicios Profesionales, Confidencialidad (NDA), Compraventa, Préstamo, Sociedad, \
         Licencia, Franquicia u Otro.\n\
         \n\
         {contract}\n\
         \n\
         Formato de respuesta:\n\
         {{\n  \
           \"type\": \"categoría principal\",\n  \
           \"subtype\": \"clasificación más específica\",\n  \
           \"confidence\": \"confianza entre 0 y 100\",\n  \
           \"reasoning\": \"justificación breve\"\n\
         }}\n\
         \n\
         {json_only}",
        contract = contract_block("CONTRATO", contract),
        json_only = JSON_ONLY,
    )
}

pub fn build_comparison_prompt(contract1: &str, contract2: &str) -> String {
    format!(
        "Eres un analista legal. Compara los dos contratos: cláusulas que solo aparecen \
         en uno, diferencias de condiciones, riesgos relativos y cuál resulta más favorable.\n\
         \n\
         {first}\n\
         \n\
         {second}\n\
         \n\
         Formato de respuesta:\n\
         {{\n  \
           \"differences\": [{{\"aspect\": \"aspecto\", \"contract1\": \"qué dice el contrato 1\", \
         \"contract2\": \"qué dice el contrato 2\", \"impact\": \"high | medium | low\"}}],\n  \
           \"recommendation\": \"contrato preferible y motivo\",\n  \
           \"missingInContract1\": [\"cláusulas ausentes en el contrato 1\"],\n  \
           \"missingInContract2\": [\"cláusulas ausentes en el contrato 2\"]\n\
         }}\n\
         \n\
         {json_only}",
        first = contract_block("CONTRATO 1", contract1),
        second = contract_block("CONTRATO 2", contract2),
        json_only = JSON_ONLY,
    )
}

pub fn build_dates_prompt(contract: &str) -> String {
    format!(
        "Extrae las fechas y plazos relevantes del contrato: inicio, término, pagos, \
         avisos, renovaciones y cualquier otro vencimiento.\n\
         \n\
         {contract}\n\
         \n\
         Formato de respuesta:\n\
         {{\n  \
           \"dates\": [{{\"type\": \"inicio, término, pago, aviso...\", \"date\": \"fecha o descripción del plazo\", \
         \"importance\": \"high | medium | low\"}}],\n  \
           \"criticalDeadlines\": [\"plazos que no deben pasarse por alto\"]\n\
         }}\n\
         \n\
         {json_only}",
        contract = contract_block("CONTRATO", contract),
        json_only = JSON_ONLY,
    )
}

/// Plain-text prompt for a legal question with no contract attached.
pub fn build_general_question_prompt(question: &str) -> String {
    format!(
        "Eres un asistente legal. Responde con claridad y en tono profesional la \
         siguiente pregunta. Si requiere asesoría para un caso concreto, recomienda \
         consultar a un abogado.\n\
         \n\
         PREGUNTA:\n\
         {question}\n\
         \n\
         Responde en texto plano, sin JSON."
    )
}

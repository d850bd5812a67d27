//! User-facing reply texts.

/// Sent when the cooldown gate fires.
pub const GREETING: &str = "Olá! Esse bot se encontra em versão experimental, siga as instruções:\nDescreva seus sintomas em sequência. Não é necessário separar por mensagens ou usar linguagem técnica.";

/// Sent when the combined utterance is under the length threshold.
pub const TOO_SHORT: &str = "Sua mensagem é muito curta! Seja mais específico.";

/// Sent when the service found nothing.
pub const NO_SYMPTOMS: &str =
    "Infelizmente não consegui obter nenhum sintoma da sua mensagem. Pode tentar novamente?";

/// Sent on any analysis failure.
pub const PROCESSING_ERROR: &str = "Houve um erro ao processar sua mensagem.";

/// Symptoms plus a general practitioner recommendation.
#[must_use]
pub fn general_practitioner(symptoms: &[String]) -> String {
    format!(
        "Seus sintomas: {}\nConsulte com um médico geral.",
        symptoms.join(", ")
    )
}

/// Symptoms plus the suggested specialties.
#[must_use]
pub fn specialists(symptoms: &[String], specialties: &[String]) -> String {
    format!(
        "Seus sintomas: {}\nConsulte com um especialista em: {}",
        symptoms.join(", "),
        specialties.join(", ")
    )
}

use crate::record::InfractionRecord;

// code, description, responsible party, fine, authority, articles, points, severity
type Row = (
    &'static str,
    &'static str,
    &'static str,
    f64,
    &'static str,
    &'static str,
    u32,
    &'static str,
);

const ROWS: &[Row] = &[
    (
        "5169-1",
        "Dirigir sob influência de álcool",
        "Condutor",
        2934.70,
        "PRF",
        "165",
        7,
        "Gravíssima",
    ),
    (
        "5185-1",
        "Deixar o condutor de usar o cinto de segurança",
        "Condutor",
        195.23,
        "Órgão de trânsito",
        "167",
        5,
        "Grave",
    ),
    (
        "6050-1",
        "Avançar o sinal vermelho do semáforo",
        "Condutor",
        293.47,
        "Órgão de trânsito",
        "208",
        7,
        "Gravíssima",
    ),
    (
        "7455-0",
        "Transitar em velocidade superior à máxima permitida em até 20%",
        "Condutor",
        130.16,
        "Órgão de trânsito",
        "218, I",
        4,
        "Média",
    ),
    (
        "7366-2",
        "Dirigir veículo utilizando-se de telefone celular",
        "Condutor",
        293.47,
        "Órgão de trânsito",
        "252, VI",
        7,
        "Gravíssima",
    ),
    (
        "5010-0",
        "Dirigir veículo sem possuir CNH ou permissão para dirigir",
        "Condutor",
        880.41,
        "Órgão de trânsito",
        "162, I",
        7,
        "Gravíssima",
    ),
    (
        "6637-1",
        "Parar o veículo sobre a faixa de pedestres na mudança de sinal luminoso",
        "Condutor",
        130.16,
        "Órgão de trânsito",
        "182, VIII",
        4,
        "Média",
    ),
    (
        "5452-0",
        "Conduzir o veículo com equipamento obrigatório ineficiente ou inoperante",
        "Proprietário",
        195.23,
        "Órgão de trânsito",
        "230, IX",
        5,
        "Grave",
    ),
    (
        "7030-0",
        "Usar buzina em desacordo com os padrões estabelecidos",
        "Condutor",
        88.38,
        "Órgão de trânsito",
        "227, V",
        3,
        "Leve",
    ),
    (
        "5576-0",
        "Deixar de atualizar o cadastro de registro do veículo",
        "Proprietário",
        0.0,
        "Órgão de trânsito",
        "241",
        0,
        "nan",
    ),
];

/// Built-in sample of the catalog, used to seed the explorer when the bulk
/// listing cannot be loaded.
pub fn fallback_records() -> Vec<InfractionRecord> {
    ROWS.iter()
        .map(
            |&(code, description, responsible, fine, authority, articles, points, severity)| {
                InfractionRecord {
                    code: code.to_string(),
                    description: description.to_string(),
                    responsible_party: responsible.to_string(),
                    points,
                    fine_amount: fine,
                    severity: severity.to_string(),
                    issuing_authority: authority.to_string(),
                    legal_articles: articles.to_string(),
                }
            },
        )
        .collect()
}

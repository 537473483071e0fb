//! Canned analysis archetypes returned by the analysis simulator.

use crate::models::{AnalysisModule, AnalysisResult, EntityValue};
use std::collections::BTreeMap;

fn list(items: &[&str]) -> EntityValue {
    EntityValue::List(items.iter().map(|s| s.to_string()).collect())
}

fn result(
    module_type: AnalysisModule,
    confidence: f32,
    summary: &str,
    recommendations: &[&str],
    entities: Vec<(&str, EntityValue)>,
) -> AnalysisResult {
    AnalysisResult {
        module_type,
        confidence,
        summary: summary.to_string(),
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        entities: entities
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// The canned result for one archetype.
pub fn archetype(module: AnalysisModule) -> AnalysisResult {
    match module {
        AnalysisModule::Crops => result(
            module,
            0.92,
            "Ce document contient des informations sur les cultures de maïs avec un historique de rendement sur 3 ans et des données sur la qualité du sol.",
            &[
                "Rotation avec une légumineuse recommandée pour la prochaine saison",
                "Ajustement du pH du sol nécessaire dans la parcelle B3",
                "Augmentation de l'irrigation recommandée de 15%",
            ],
            vec![
                ("cultures", list(&["Maïs", "Manioc"])),
                ("parcelles", list(&["A2", "B3", "C1"])),
                ("saisons", list(&["2023", "2024"])),
            ],
        ),
        AnalysisModule::Livestock => result(
            module,
            0.88,
            "Registre de suivi pour 24 bovins avec historique médical et données de production laitière.",
            &[
                "Vaccination contre la fièvre aphteuse recommandée dans les 2 semaines",
                "Modification du régime alimentaire pour les génisses",
                "Suivi particulier pour les animaux 103 et 107",
            ],
            vec![
                ("especes", list(&["Bovins"])),
                ("nombre", EntityValue::Count(24)),
                ("maladies", list(&["Mammite", "Parasitose"])),
            ],
        ),
        AnalysisModule::Financing => result(
            module,
            0.85,
            "Documents sur le Programme National d'Aide aux Agriculteurs avec critères d'éligibilité et formulaires.",
            &[
                "Votre exploitation est éligible à l'aide A3 avec un potentiel de financement de 2.5M FCFA",
                "Préparez les documents administratifs nécessaires avant le 30 juin",
                "Un cofinancement à 20% est nécessaire",
            ],
            vec![
                ("programmes", list(&["PNAA", "Fonds Agricole 2025"])),
                ("montants", list(&["2.5M FCFA", "750K FCFA"])),
                ("echeances", list(&["30/06/2025"])),
            ],
        ),
        AnalysisModule::Decision => result(
            module,
            0.90,
            "Rapport d'analyse agronomique avec données climatiques et prévisions de rendement pour la région Centre.",
            &[
                "Anticiper une saison des pluies précoce cette année (début mi-mai)",
                "Privilégier les variétés à cycle court pour cette saison",
                "Préparer un plan de drainage pour les parcelles en zone basse",
            ],
            vec![
                ("facteurs", list(&["Pluviométrie", "Température", "Humidité"])),
                ("previsions", list(&["Pluies précoces", "Température +2°C"])),
                ("zones", list(&["Centre", "Sud-Est"])),
            ],
        ),
        AnalysisModule::Documents => result(
            module,
            0.75,
            "Document technique sur les pratiques agricoles durables avec focus sur l'agroforesterie.",
            &[
                "Application possible des techniques d'agroforesterie sur vos parcelles A1 et B2",
                "Formation disponible au centre agricole régional en juillet",
                "Possibilité de certification bio dans un délai de 2 ans",
            ],
            vec![
                ("themes", list(&["Agroforesterie", "Agriculture durable"])),
                ("techniques", list(&["Cultures associées", "Couvert végétal"])),
                ("certifications", list(&["Bio", "Rainforest"])),
            ],
        ),
    }
}

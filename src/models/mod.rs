// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes utilisateurs (profil, vérification email, reset password)
//   - cards : Cartes texte libres (endpoints addcard/searchcards)
//   - flashcard_sets : Sets de flashcards générés par IA (score max par set)
//   - flashcards : Cartes question/réponse d'un set
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les codes de vérification/reset vivent sur le compte lui-même
//     (colonnes nullables), pas dans des tables de tokens séparées
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod health;
pub mod users;
pub mod cards;
pub mod flashcard_sets;
pub mod flashcards;
pub mod dto;
